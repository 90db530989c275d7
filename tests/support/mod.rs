/*!
Test support helpers shared across integration tests.

- have_git(): check git availability on PATH
- git(dir, args): run git in `dir`, panicking on failure
- DocsRepo: an upstream repository with version branches plus a clone tracking it
- FakeDocker: CommandRunner that runs git for real and simulates docker build/run
- OneShotServer: answers exactly one HTTP request with a canned response

These helpers do not print skip messages themselves so tests can keep their
"skipping: ..." outputs local.
*/

use std::cell::RefCell;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;

use multidoc::util::{CommandRunner, ExecOutput, ExecRequest, ExecService};

/// Return true if `git` is available on PATH.
#[allow(dead_code)]
pub fn have_git() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run git in `dir` with a fixed identity and signing disabled.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let out = Command::new("git")
        .args([
            "-c",
            "user.name=Multidoc Test",
            "-c",
            "user.email=multidoc@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("spawn git");
    assert!(
        out.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).into_owned()
}

/// Upstream repository plus a clone whose `origin/*` refs are the version branches.
#[allow(dead_code)]
pub struct DocsRepo {
    pub upstream: PathBuf,
    pub clone: PathBuf,
}

#[allow(dead_code)]
impl DocsRepo {
    /// `branches` maps a branch name to the files committed on it (path, content).
    /// `master` always exists; list it to give it content. Every other branch starts from the
    /// README-only root commit, so it holds only its own files.
    pub fn create(root: &Path, branches: &[(&str, Vec<(&str, &str)>)]) -> DocsRepo {
        let upstream = root.join("upstream");
        std::fs::create_dir_all(&upstream).expect("mkdir upstream");
        git(&upstream, &["init", "-q"]);
        std::fs::write(upstream.join("README.md"), "# demo\n").expect("write readme");
        git(&upstream, &["add", "-A"]);
        git(&upstream, &["commit", "-q", "-m", "init"]);
        git(&upstream, &["branch", "-M", "master"]);
        let root_commit = git(&upstream, &["rev-parse", "HEAD"]).trim().to_string();

        for (name, files) in branches {
            if *name == "master" {
                git(&upstream, &["checkout", "-q", "master"]);
            } else {
                git(&upstream, &["checkout", "-q", "-b", *name, root_commit.as_str()]);
            }
            for (path, content) in files {
                let p = upstream.join(path);
                if let Some(parent) = p.parent() {
                    std::fs::create_dir_all(parent).expect("mkdir");
                }
                std::fs::write(&p, content).expect("write file");
            }
            git(&upstream, &["add", "-A"]);
            git(&upstream, &["commit", "-q", "--allow-empty", "-m", *name]);
            git(&upstream, &["checkout", "-q", "master"]);
        }

        let clone = root.join("clone");
        git(
            root,
            &["clone", "-q", &upstream.display().to_string(), &clone.display().to_string()],
        );
        DocsRepo { upstream, clone }
    }

    /// Number of worktrees registered in the clone (the main checkout included).
    pub fn worktree_count(&self) -> usize {
        git(&self.clone, &["worktree", "list", "--porcelain"])
            .lines()
            .filter(|l| l.starts_with("worktree "))
            .count()
    }
}

/// Runs git for real; `docker build` is recorded and `docker run` writes a fake generated site
/// into `<docs_root>/site`.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeDocker {
    inner: ExecService,
    pub docker_calls: RefCell<Vec<Vec<String>>>,
    /// Fail the docker call whose command line contains this word.
    pub fail_on: Option<String>,
}

#[allow(dead_code)]
impl FakeDocker {
    pub fn failing_on(word: &str) -> Self {
        Self {
            fail_on: Some(word.to_string()),
            ..Self::default()
        }
    }

    pub fn builds(&self) -> Vec<Vec<String>> {
        self.docker_calls
            .borrow()
            .iter()
            .filter(|c| c.first().map(String::as_str) == Some("build"))
            .cloned()
            .collect()
    }

    fn simulate_run(args: &[String]) {
        let mount = args
            .iter()
            .position(|a| a == "-v")
            .and_then(|i| args.get(i + 1))
            .expect("volume argument");
        let docs_root = PathBuf::from(mount.rsplit_once(':').expect("host:container").0);
        let image = args
            .iter()
            .rev()
            .nth(2)
            .expect("image argument")
            .clone();
        let label = image.rsplit_once(':').map(|(_, t)| t.to_string()).unwrap_or_default();

        let site = docs_root.join("site");
        std::fs::create_dir_all(&site).expect("mkdir site");
        std::fs::write(site.join("index.html"), format!("<h1>{label}</h1>")).expect("index");
        for (from, to) in [
            ("mkdocs.yml", "mkdocs.yml"),
            ("requirements.txt", "requirements.txt"),
            ("docs/theme/js/multidoc-menu.js", "menu.js"),
        ] {
            let src = docs_root.join(from);
            if src.is_file() {
                std::fs::copy(&src, site.join(to)).expect("copy");
            }
        }
    }
}

impl CommandRunner for FakeDocker {
    fn run(&self, request: ExecRequest) -> anyhow::Result<ExecOutput> {
        if request.program_name() != "docker" {
            return self.inner.run(request);
        }
        let args = request.args_lossy();
        self.docker_calls.borrow_mut().push(args.clone());

        // Reuse a real process to get an ExitStatus.
        let fail = self
            .fail_on
            .as_ref()
            .map(|w| args.iter().any(|a| a.contains(w.as_str())))
            .unwrap_or(false);
        if fail {
            return self
                .inner
                .run(ExecRequest::new("sh").args(["-c", "echo docker exploded 1>&2; exit 1"]));
        }
        if args.first().map(String::as_str) == Some("run") {
            Self::simulate_run(&args);
        }
        self.inner.run(ExecRequest::new("true"))
    }
}

/// Listener on an ephemeral port answering a single request.
#[allow(dead_code)]
pub struct OneShotServer {
    listener: TcpListener,
    pub base_url: String,
}

#[allow(dead_code)]
impl OneShotServer {
    pub fn bind() -> OneShotServer {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
        let port = listener.local_addr().expect("addr").port();
        OneShotServer {
            listener,
            base_url: format!("http://127.0.0.1:{port}"),
        }
    }

    /// Serve `response` verbatim; the join handle yields the raw request head.
    pub fn respond(self, response: String) -> JoinHandle<String> {
        std::thread::spawn(move || {
            let (mut stream, _) = self.listener.accept().expect("accept");
            let mut buf = Vec::new();
            let mut tmp = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut tmp) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&tmp[..n]),
                }
            }
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            String::from_utf8_lossy(&buf).into_owned()
        })
    }
}

/// Build a raw HTTP/1.1 response with `Connection: close`.
#[allow(dead_code)]
pub fn http_response(status_line: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut s = format!("HTTP/1.1 {status_line}\r\n");
    for (k, v) in headers {
        s.push_str(&format!("{k}: {v}\r\n"));
    }
    s.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    ));
    s
}
