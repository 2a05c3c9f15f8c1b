use blueprint_core::{Workspace, WorkspaceBuilder};
use tempfile::TempDir;

/// Model output used across tests: two files and a command.
pub const TODO_RESPONSE: &str = r#"I'll set up a todo app.

<boltArtifact id="todo-app" title="Todo App">
<boltAction type="file" filePath="package.json">
{
  "name": "todo-app",
  "scripts": { "dev": "vite" }
}
</boltAction>
<boltAction type="file" filePath="src/components/TodoList.tsx">
export function TodoList() {
  return <ul />;
}
</boltAction>
<boltAction type="shell">
npm install && npm run dev
</boltAction>
</boltArtifact>"#;

/// Helper function to create a test workspace
pub async fn create_test_workspace() -> (TempDir, Workspace) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let workspace = WorkspaceBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create workspace");
    (temp_dir, workspace)
}
