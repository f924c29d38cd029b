use std::collections::HashMap;

use clowder::api::metadata::parse_metadata_pairs;
use clowder::api::types::MetadataDocument;
use clowder::api::ClowderClient;
use clowder::resolve::Target;

/// What to do with the metadata of a dataset or file.
pub enum MetadataAction {
    List { extractor: Option<String> },
    Add { pairs: Vec<String> },
    Delete { extractor: Option<String> },
}

pub async fn run(
    client: &ClowderClient,
    target: Target<'_>,
    action: MetadataAction,
) -> anyhow::Result<()> {
    match action {
        MetadataAction::List { extractor } => {
            let documents = client.list_metadata(target, extractor.as_deref()).await?;
            let mut names: HashMap<String, String> = HashMap::new();
            let mut output = String::new();
            for doc in &documents {
                let agent = agent_label(client, doc, &mut names).await?;
                output.push_str(&format_document(&agent, doc));
            }
            print!("{}", output);
        }
        MetadataAction::Add { pairs } => {
            let content = parse_metadata_pairs(&pairs)?;
            client.add_metadata(target, &content).await?;
        }
        MetadataAction::Delete { extractor } => {
            client.delete_metadata(target, extractor.as_deref()).await?;
        }
    }
    Ok(())
}

/// Who contributed `doc`: the user's full name, the raw id for users the
/// service no longer knows, otherwise the extractor name.
async fn agent_label(
    client: &ClowderClient,
    doc: &MetadataDocument,
    names: &mut HashMap<String, String>,
) -> anyhow::Result<String> {
    let Some(user_id) = doc.agent.user_identifier() else {
        return Ok(doc
            .agent
            .name
            .clone()
            .or_else(|| doc.agent.extractor_id.clone())
            .unwrap_or_else(|| doc.agent.kind.clone()));
    };
    if let Some(name) = names.get(user_id) {
        return Ok(name.clone());
    }
    let name = client
        .user_display_name(user_id)
        .await?
        .unwrap_or_else(|| user_id.to_string());
    names.insert(user_id.to_string(), name.clone());
    Ok(name)
}

fn format_document(agent: &str, doc: &MetadataDocument) -> String {
    let mut output = match &doc.created_at {
        Some(created) => format!("{} ({})\n", agent, created),
        None => format!("{}\n", agent),
    };
    for (key, value) in &doc.content {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        output.push_str(&format!("  {}: {}\n", key, value));
    }
    output
}
