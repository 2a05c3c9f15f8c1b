mod common;

use blueprint_core::{
    BuildError, FileItem, StepKind, StepStatus, WorkspaceBuilder,
    mount::MountEntry,
    params::{CreateSession, Id, IngestResponse, ReadFile, StartScript},
};
use common::{TODO_RESPONSE, create_test_workspace};
use tempfile::TempDir;

#[tokio::test]
async fn test_response_to_mount_structure() {
    let (_temp_dir, workspace) = create_test_workspace().await;

    let session = workspace
        .create_session(&CreateSession {
            prompt: "a todo app".to_string(),
            title: None,
        })
        .await
        .unwrap();

    let result = workspace
        .ingest_response(&IngestResponse {
            session_id: session.id,
            response: TODO_RESPONSE.to_string(),
            defer: false,
        })
        .await
        .unwrap();

    let kinds: Vec<StepKind> = result.session().steps.iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![StepKind::CreateFile, StepKind::CreateFile, StepKind::RunScript]
    );

    let tree = workspace.file_tree(&Id { id: session.id }).await.unwrap();
    let components = tree.find("/src/components").expect("components folder");
    assert!(components.is_folder());
    assert_eq!(
        components.children().iter().map(FileItem::name).collect::<Vec<_>>(),
        vec!["TodoList.tsx"]
    );

    let mount = workspace.mount_structure(&Id { id: session.id }).await.unwrap();
    let json = serde_json::to_value(&mount).unwrap();
    assert_eq!(
        json["src"]["directory"]["components"]["directory"]["TodoList.tsx"]["file"]["contents"],
        "export function TodoList() {\n  return <ul />;\n}"
    );
    assert!(matches!(mount.get("package.json"), Some(MountEntry::File { .. })));
}

#[tokio::test]
async fn test_follow_up_overwrites_file() {
    let (_temp_dir, workspace) = create_test_workspace().await;
    let id = workspace
        .create_session(&CreateSession {
            prompt: "a todo app".to_string(),
            title: Some("Todos".to_string()),
        })
        .await
        .unwrap()
        .id;

    for response in [
        TODO_RESPONSE,
        "<boltAction type=\"file\" filePath=\"src/components/TodoList.tsx\">\nexport const TodoList = () => null;\n</boltAction>",
    ] {
        workspace
            .ingest_response(&IngestResponse {
                session_id: id,
                response: response.to_string(),
                defer: false,
            })
            .await
            .unwrap();
    }

    let content = workspace
        .read_file(&ReadFile {
            session_id: id,
            path: "src/components/TodoList.tsx".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(content, "export const TodoList = () => null;");

    let tree = workspace.file_tree(&Id { id }).await.unwrap();
    assert_eq!(tree.file_count(), 2);
    assert!(tree.check_invariants().is_empty());

    let session = workspace.get_session(&Id { id }).await.unwrap().unwrap();
    assert_eq!(session.title, "Todos");
    assert_eq!(session.steps.len(), 4);
}

#[tokio::test]
async fn test_script_lifecycle() {
    let (_temp_dir, workspace) = create_test_workspace().await;
    let id = workspace
        .create_session(&CreateSession {
            prompt: "p".to_string(),
            title: None,
        })
        .await
        .unwrap()
        .id;
    workspace
        .ingest_response(&IngestResponse {
            session_id: id,
            response: TODO_RESPONSE.to_string(),
            defer: false,
        })
        .await
        .unwrap();

    let steps = workspace.get_steps(&Id { id }).await.unwrap();
    let script = steps
        .iter()
        .find(|s| s.kind() == StepKind::RunScript)
        .expect("script step");
    assert_eq!(script.status, StepStatus::Pending);

    let started = workspace
        .start_script(&StartScript {
            session_id: id,
            step_id: script.id,
        })
        .await
        .unwrap();
    assert_eq!(started.status, StepStatus::InProgress);

    // A second materialization leaves the running script alone.
    let again = workspace.materialize(&Id { id }).await.unwrap();
    let report = again.0.report.expect("report");
    assert!(report.completed.is_empty());
    assert!(report.deferred_scripts.is_empty());
}

#[tokio::test]
async fn test_state_survives_reopening_the_database() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("state.db");

    let id = {
        let workspace = WorkspaceBuilder::new()
            .with_database_path(Some(&db_path))
            .build()
            .await
            .unwrap();
        let id = workspace
            .create_session(&CreateSession {
                prompt: "persist me".to_string(),
                title: None,
            })
            .await
            .unwrap()
            .id;
        workspace
            .ingest_response(&IngestResponse {
                session_id: id,
                response: TODO_RESPONSE.to_string(),
                defer: false,
            })
            .await
            .unwrap();
        id
    };

    let reopened = WorkspaceBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .unwrap();
    let session = reopened.get_session(&Id { id }).await.unwrap().unwrap();
    // Only a loaded template names the session.
    assert!(session.title.is_empty());
    assert_eq!(session.completed_steps(), 2);
    assert_eq!(session.files.file_count(), 2);
}

#[tokio::test]
async fn test_operations_on_missing_session() {
    let (_temp_dir, workspace) = create_test_workspace().await;

    assert!(workspace.get_session(&Id { id: 1 }).await.unwrap().is_none());
    assert!(matches!(
        workspace.materialize(&Id { id: 1 }).await,
        Err(BuildError::SessionNotFound { id: 1 })
    ));
    assert!(matches!(
        workspace.mount_structure(&Id { id: 1 }).await,
        Err(BuildError::SessionNotFound { id: 1 })
    ));
}
