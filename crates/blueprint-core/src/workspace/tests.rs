//! Tests for the workspace module.

use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::{
    error::BuildError,
    models::{StepAction, StepDraft, StepKind, StepStatus},
    mount::MountEntry,
    params::{
        AppendSteps, CreateSession, Id, IngestResponse, LoadTemplate, ParseResponse, ReadFile,
        SendMessage, StartScript,
    },
};

const TEMPLATE: &str = r#"<boltArtifact id="project-import" title="Vite Starter">
<boltAction type="file" filePath="package.json">
{"name": "starter"}
</boltAction>
<boltAction type="file" filePath="src/main.tsx">
import App from './App';
</boltAction>
</boltArtifact>"#;

const RESPONSE: &str = r#"Here you go.
<boltArtifact id="todo" title="Todo">
<boltAction type="file" filePath="src/App.tsx">
export default function App() { return null; }
</boltAction>
<boltAction type="shell">
npm install
</boltAction>
</boltArtifact>"#;

const MIXED_RESPONSE: &str = r#"<boltArtifact id="styles" title="Styles">
<boltAction type="file" filePath="./src/index.css">
body { margin: 0; }
</boltAction>
<boltAction type="file" filePath="../outside.txt">
nope
</boltAction>
</boltArtifact>"#;

/// Helper function to create a test workspace
async fn create_test_workspace(auto_materialize: bool) -> (TempDir, Workspace) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let workspace = WorkspaceBuilder::new()
        .with_database_path(Some(&db_path))
        .with_auto_materialize(auto_materialize)
        .build()
        .await
        .expect("Failed to create workspace");
    (temp_dir, workspace)
}

async fn create_session(workspace: &Workspace) -> u64 {
    workspace
        .create_session(&CreateSession {
            prompt: "a todo app".to_string(),
            title: None,
        })
        .await
        .expect("Failed to create session")
        .id
}

#[tokio::test]
async fn test_create_session_rejects_blank_prompt() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;

    let result = workspace
        .create_session(&CreateSession {
            prompt: "   ".to_string(),
            title: None,
        })
        .await;

    assert!(matches!(result, Err(BuildError::InvalidInput { ref field, .. }) if field == "prompt"));
}

#[tokio::test]
async fn test_template_then_response_builds_tree() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;
    let id = create_session(&workspace).await;

    let loaded = workspace
        .load_template(&LoadTemplate {
            session_id: id,
            template: TEMPLATE.to_string(),
            prompts: vec!["base".to_string()],
        })
        .await
        .expect("Failed to load template");
    assert_eq!(loaded.session().title, "Vite Starter");
    assert_eq!(loaded.0.appended, vec![1, 2]);

    let result = workspace
        .ingest_response(&IngestResponse {
            session_id: id,
            response: RESPONSE.to_string(),
            defer: false,
        })
        .await
        .expect("Failed to ingest response");

    let session = result.session();
    assert_eq!(session.steps.len(), 4);
    assert_eq!(session.completed_steps(), 3);
    assert_eq!(session.steps[3].kind(), StepKind::RunScript);
    assert_eq!(session.steps[3].status, StepStatus::Pending);

    let content = workspace
        .read_file(&ReadFile {
            session_id: id,
            path: "/src/App.tsx".to_string(),
        })
        .await
        .expect("Failed to read file");
    assert_eq!(content, "export default function App() { return null; }");

    // Conversation: hidden prompt, user prompt, assistant response.
    let stored = workspace.get_session(&Id { id }).await.unwrap().unwrap();
    assert_eq!(stored.messages.len(), 3);
}

#[tokio::test]
async fn test_deferred_ingest_leaves_steps_pending() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;
    let id = create_session(&workspace).await;

    let result = workspace
        .ingest_response(&IngestResponse {
            session_id: id,
            response: RESPONSE.to_string(),
            defer: true,
        })
        .await
        .unwrap();
    assert!(result.0.report.is_none());
    assert!(result.session().files.is_empty());

    let built = workspace.materialize(&Id { id }).await.unwrap();
    let report = built.0.report.expect("report");
    assert_eq!(report.completed, vec![1]);
    assert_eq!(report.deferred_scripts, vec![2]);
}

#[tokio::test]
async fn test_auto_materialize_disabled() {
    let (_temp_dir, workspace) = create_test_workspace(false).await;
    let id = create_session(&workspace).await;

    workspace
        .ingest_response(&IngestResponse {
            session_id: id,
            response: RESPONSE.to_string(),
            defer: false,
        })
        .await
        .unwrap();

    let tree = workspace.file_tree(&Id { id }).await.unwrap();
    assert!(tree.is_empty());
}

#[tokio::test]
async fn test_invalid_path_rolls_back_whole_batch() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;
    let id = create_session(&workspace).await;

    let steps = vec![
        StepDraft {
            title: "good".to_string(),
            description: None,
            action: StepAction::CreateFile {
                path: "/good.txt".to_string(),
                code: "ok".to_string(),
            },
        },
        StepDraft {
            title: "bad".to_string(),
            description: None,
            action: StepAction::CreateFile {
                path: "/a/../b.txt".to_string(),
                code: "no".to_string(),
            },
        },
    ];

    let result = workspace
        .append_steps(&AppendSteps {
            session_id: id,
            steps,
        })
        .await;
    assert!(matches!(result, Err(BuildError::InvalidPath { .. })));

    // Appending and materializing share one commit, so neither happened.
    let session = workspace.get_session(&Id { id }).await.unwrap().unwrap();
    assert!(session.steps.is_empty());
    assert!(session.files.is_empty());
}

#[tokio::test]
async fn test_unusable_block_does_not_block_valid_file() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;
    let id = create_session(&workspace).await;

    let result = workspace
        .ingest_response(&IngestResponse {
            session_id: id,
            response: MIXED_RESPONSE.to_string(),
            defer: false,
        })
        .await
        .expect("valid block should still be applied");
    assert_eq!(result.0.appended, vec![1]);

    let content = workspace
        .read_file(&ReadFile {
            session_id: id,
            path: "/src/index.css".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(content, "body { margin: 0; }");
}

#[tokio::test]
async fn test_deferred_session_materializes_after_unusable_block() {
    let (_temp_dir, workspace) = create_test_workspace(false).await;
    let id = create_session(&workspace).await;

    for response in [MIXED_RESPONSE, RESPONSE] {
        workspace
            .ingest_response(&IngestResponse {
                session_id: id,
                response: response.to_string(),
                defer: true,
            })
            .await
            .unwrap();
    }

    let built = workspace.materialize(&Id { id }).await.unwrap();
    let report = built.0.report.as_ref().expect("report");
    assert_eq!(report.completed, vec![1, 2]);
    assert_eq!(report.deferred_scripts, vec![3]);
    assert_eq!(built.session().files.file_count(), 2);
}

#[tokio::test]
async fn test_materialize_without_pending_files_does_not_write() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;
    let id = create_session(&workspace).await;
    workspace
        .ingest_response(&IngestResponse {
            session_id: id,
            response: RESPONSE.to_string(),
            defer: false,
        })
        .await
        .unwrap();
    let before = workspace.get_session(&Id { id }).await.unwrap().unwrap();

    // Only the script step is still pending.
    let result = workspace.materialize(&Id { id }).await.unwrap();
    let report = result.0.report.expect("report");
    assert!(report.completed.is_empty());
    assert_eq!(report.deferred_scripts, vec![2]);

    let after = workspace.get_session(&Id { id }).await.unwrap().unwrap();
    assert_eq!(after.updated_at, before.updated_at);
    assert_eq!(after.steps, before.steps);
}

#[tokio::test]
async fn test_start_script() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;
    let id = create_session(&workspace).await;
    workspace
        .ingest_response(&IngestResponse {
            session_id: id,
            response: RESPONSE.to_string(),
            defer: false,
        })
        .await
        .unwrap();

    let step = workspace
        .start_script(&StartScript {
            session_id: id,
            step_id: 2,
        })
        .await
        .expect("Failed to start script");
    assert_eq!(step.status, StepStatus::InProgress);

    let not_a_script = workspace
        .start_script(&StartScript {
            session_id: id,
            step_id: 1,
        })
        .await;
    assert!(matches!(not_a_script, Err(BuildError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_send_message_and_missing_session() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;
    let id = create_session(&workspace).await;

    workspace
        .send_message(&SendMessage {
            session_id: id,
            content: "make it blue".to_string(),
        })
        .await
        .unwrap();

    let missing = workspace
        .send_message(&SendMessage {
            session_id: id + 100,
            content: "hello".to_string(),
        })
        .await;
    assert!(matches!(missing, Err(BuildError::SessionNotFound { .. })));
}

#[tokio::test]
async fn test_read_file_errors() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;
    let id = create_session(&workspace).await;
    workspace
        .ingest_response(&IngestResponse {
            session_id: id,
            response: RESPONSE.to_string(),
            defer: false,
        })
        .await
        .unwrap();

    let folder = workspace
        .read_file(&ReadFile {
            session_id: id,
            path: "/src".to_string(),
        })
        .await;
    assert!(matches!(folder, Err(BuildError::InvalidPath { ref reason, .. }) if reason == "is a folder"));

    let missing = workspace
        .read_file(&ReadFile {
            session_id: id,
            path: "/nope.txt".to_string(),
        })
        .await;
    assert!(matches!(missing, Err(BuildError::InvalidPath { .. })));
}

#[tokio::test]
async fn test_mount_structure_and_project_files() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;
    let id = create_session(&workspace).await;
    workspace
        .load_template(&LoadTemplate {
            session_id: id,
            template: TEMPLATE.to_string(),
            prompts: Vec::new(),
        })
        .await
        .unwrap();

    let mount = workspace.mount_structure(&Id { id }).await.unwrap();
    let Some(MountEntry::Directory(src)) = mount.get("src") else {
        panic!("src should be a directory");
    };
    assert!(matches!(src.get("main.tsx"), Some(MountEntry::File { .. })));

    let flat = workspace.project_files(&Id { id }).await.unwrap();
    assert_eq!(flat.get("src/main.tsx").map(String::as_str), Some("import App from './App';"));
}

#[tokio::test]
async fn test_list_and_delete_sessions() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;
    let first = create_session(&workspace).await;
    let second = create_session(&workspace).await;

    let summaries = workspace.list_sessions().await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, second);

    let deleted = workspace.delete_session(&Id { id: first }).await.unwrap();
    assert_eq!(deleted.id, first);
    assert_eq!(workspace.list_sessions().await.unwrap().len(), 1);
    assert!(matches!(
        workspace.delete_session(&Id { id: first }).await,
        Err(BuildError::SessionNotFound { .. })
    ));
}

#[tokio::test]
async fn test_parse_response_is_stateless() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;

    let drafts = workspace.parse_response(&ParseResponse {
        response: RESPONSE.to_string(),
    });
    assert_eq!(drafts.len(), 2);
    assert!(workspace.list_sessions().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ingests_are_serialized() {
    let (_temp_dir, workspace) = create_test_workspace(true).await;
    let workspace = Arc::new(workspace);
    let id = create_session(&workspace).await;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let workspace = Arc::clone(&workspace);
            tokio::spawn(async move {
                let response = format!(
                    "<boltAction type=\"file\" filePath=\"src/file{i}.ts\">export const n = {i};</boltAction>"
                );
                workspace
                    .ingest_response(&IngestResponse {
                        session_id: id,
                        response,
                        defer: false,
                    })
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let session = workspace.get_session(&Id { id }).await.unwrap().unwrap();
    let mut ids: Vec<u64> = session.steps.iter().map(|s| s.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    assert_eq!(session.files.file_count(), 8);
    assert_eq!(session.completed_steps(), 8);
    assert!(session.files.check_invariants().is_empty());
}
