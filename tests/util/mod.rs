use std::path::PathBuf;
use std::sync::Arc;
use taskdeck::model::types::{Project, SidebarProject, SidebarSession, SidebarTask};
use taskdeck::ui::components::command_index::PaletteSources;
use tempfile::TempDir;

/// Captures tracing output for tests.
#[allow(dead_code)]
pub struct TestTracing {
    buffer: std::sync::Arc<std::sync::Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl TestTracing {
    pub fn new() -> Self {
        Self {
            buffer: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Assert that the captured log output contains the provided substring.
    pub fn assert_contains(&self, needle: &str) {
        let out = self.output();
        assert!(
            out.contains(needle),
            "expected logs to contain `{needle}`, got:\n{out}"
        );
    }
}

struct TestWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TempFixtureDir {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TempFixtureDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Write `contents` to `name` inside the fixture dir and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }
}

/// Builder for sidebar trees: projects → tasks → sessions.
#[allow(dead_code)]
#[derive(Default)]
pub struct SidebarBuilder {
    projects: Vec<SidebarProject>,
}

#[allow(dead_code)]
impl SidebarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(mut self, id: &str, name: &str) -> Self {
        self.projects.push(SidebarProject {
            id: id.to_string(),
            name: name.to_string(),
            tasks: Vec::new(),
        });
        self
    }

    /// Add a task to the most recent project.
    pub fn task(mut self, id: &str, title: &str, status: &str) -> Self {
        let project = self.projects.last_mut().expect("task needs a project");
        project.tasks.push(SidebarTask {
            id: id.to_string(),
            title: title.to_string(),
            status: status.to_string(),
            sessions: Vec::new(),
        });
        self
    }

    /// Add a session to the most recent task.
    pub fn session(mut self, id: &str, provider: &str, number: u32, status: &str) -> Self {
        let task = self
            .projects
            .last_mut()
            .and_then(|p| p.tasks.last_mut())
            .expect("session needs a task");
        task.sessions.push(SidebarSession {
            id: id.to_string(),
            provider: provider.to_string(),
            number,
            status: status.to_string(),
        });
        self
    }

    pub fn build(self) -> Vec<SidebarProject> {
        self.projects
    }

    pub fn shared(self) -> Option<Arc<[SidebarProject]>> {
        Some(Arc::from(self.projects))
    }
}

#[allow(dead_code)]
pub fn project(id: &str, name: &str, path: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        path: path.to_string(),
    }
}

/// Two projects, three tasks, three sessions; one task in review and one
/// session waiting for input.
#[allow(dead_code)]
pub fn sample_sources() -> PaletteSources {
    let projects = vec![
        project("p1", "Backend", "~/src/backend"),
        project("p2", "Frontend", "~/src/frontend"),
    ];
    let sidebar = SidebarBuilder::new()
        .project("p1", "Backend")
        .task("t1", "Fix login", "in_review")
        .session("s1", "Claude", 1, "running")
        .session("s2", "Codex", 2, "waiting_for_input")
        .task("t2", "Add metrics", "todo")
        .project("p2", "Frontend")
        .task("t3", "Dark mode", "in_progress")
        .session("s3", "Claude", 1, "done")
        .shared();
    PaletteSources::new(Some(Arc::from(projects)), sidebar)
}

/// JSON form of [`sample_sources`], for CLI tests.
#[allow(dead_code)]
pub const SAMPLE_WORKSPACE_JSON: &str = r#"{
  "projects": [
    { "id": "p1", "name": "Backend", "path": "~/src/backend" },
    { "id": "p2", "name": "Frontend", "path": "~/src/frontend" }
  ],
  "sidebar": [
    {
      "id": "p1",
      "name": "Backend",
      "tasks": [
        {
          "id": "t1",
          "title": "Fix login",
          "status": "in_review",
          "sessions": [
            { "id": "s1", "provider": "Claude", "number": 1, "status": "running" },
            { "id": "s2", "provider": "Codex", "number": 2, "status": "waiting_for_input" }
          ]
        },
        { "id": "t2", "title": "Add metrics", "status": "todo" }
      ]
    },
    {
      "id": "p2",
      "name": "Frontend",
      "tasks": [
        {
          "id": "t3",
          "title": "Dark mode",
          "status": "in_progress",
          "sessions": [
            { "id": "s3", "provider": "Claude", "number": 1, "status": "done" }
          ]
        }
      ]
    }
  ]
}"#;
