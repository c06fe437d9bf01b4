use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub data: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        let data = tmp.path().join("data");
        fs::create_dir_all(&data).expect("create data dir");

        Self {
            _tmp: tmp,
            home,
            data,
        }
    }

    pub fn write_form(&self, file: &str, content: &str) -> PathBuf {
        let path = self.data.join(file);
        fs::write(&path, content).expect("write fixture document");
        path
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("formdiff");
        cmd.env("HOME", &self.home);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        self.run_json_code(args, 0)
    }

    pub fn run_json_code(&self, args: &[&str], code: i32) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

/// A complete document fixture: envelope, form element with id, contract
/// number, plus caller-provided form content.
pub fn form_doc(form_id: &str, contract: &str, inner: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!-- generated test fixture -->\n\
         <dokument>\n\
           <formular id=\"{}\">\n\
             <v_vertragsnummer>{}</v_vertragsnummer>\n\
             {}\n\
           </formular>\n\
         </dokument>\n",
        form_id, contract, inner
    )
}
