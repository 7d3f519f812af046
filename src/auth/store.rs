use crate::utils::error::{TrunkError, TrunkResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One `host, login, password` line of the credential file. The password
/// slot holds the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub host: String,
    pub login: String,
    pub token: String,
}

/// Encrypts and decrypts the credential file contents.
///
/// The plaintext cipher is the identity; the gpg cipher pipes the bytes
/// through the `gpg` binary. The store never interprets ciphertext itself.
pub trait Cipher {
    fn open(&self, bytes: &[u8]) -> TrunkResult<String>;
    fn seal(&self, text: &str) -> TrunkResult<Vec<u8>>;
}

pub struct Plaintext;

impl Cipher for Plaintext {
    fn open(&self, bytes: &[u8]) -> TrunkResult<String> {
        String::from_utf8(bytes.to_vec())
            .map_err(|_| TrunkError::Config("Credential file is not valid UTF-8".to_string()))
    }

    fn seal(&self, text: &str) -> TrunkResult<Vec<u8>> {
        Ok(text.as_bytes().to_vec())
    }
}

pub struct Gpg;

impl Cipher for Gpg {
    fn open(&self, bytes: &[u8]) -> TrunkResult<String> {
        let decrypted = run_gpg(&["--decrypt"], bytes)?;
        String::from_utf8(decrypted)
            .map_err(|_| TrunkError::Config("Decrypted credential file is not valid UTF-8".to_string()))
    }

    fn seal(&self, text: &str) -> TrunkResult<Vec<u8>> {
        run_gpg(
            &["--batch", "--yes", "--encrypt", "--default-recipient-self"],
            text.as_bytes(),
        )
    }
}

fn run_gpg(args: &[&str], input: &[u8]) -> TrunkResult<Vec<u8>> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("gpg")
        .args(args)
        .arg("--quiet")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(input)?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(TrunkError::Config(
            "gpg failed to process the credential file".to_string(),
        ));
    }
    Ok(output.stdout)
}

/// File-backed mapping from registry host to stored credential.
///
/// Entries are read from disk on first access and memoized on the store
/// instance for the rest of the process.
pub struct CredentialStore {
    path: PathBuf,
    cipher: Box<dyn Cipher>,
    entries: Option<Vec<Credential>>,
}

impl CredentialStore {
    /// Store backed by the resolved credential file location
    pub fn open() -> TrunkResult<Self> {
        Ok(Self::at(resolve_path()?))
    }

    /// Store backed by an explicit path. A `.gpg` extension selects the
    /// gpg cipher.
    pub fn at(path: PathBuf) -> Self {
        let cipher: Box<dyn Cipher> = if path.extension().map_or(false, |ext| ext == "gpg") {
            Box::new(Gpg)
        } else {
            Box::new(Plaintext)
        };
        Self {
            path,
            cipher,
            entries: None,
        }
    }

    fn ensure_loaded(&mut self) -> TrunkResult<()> {
        if self.entries.is_some() {
            return Ok(());
        }
        let entries = if self.path.exists() {
            let bytes = fs::read(&self.path)?;
            parse(&self.cipher.open(&bytes)?)
        } else {
            Vec::new()
        };
        self.entries = Some(entries);
        Ok(())
    }

    /// Credential stored for `host`, if any
    pub fn get(&mut self, host: &str) -> TrunkResult<Option<&Credential>> {
        self.ensure_loaded()?;
        Ok(self
            .entries
            .as_ref()
            .and_then(|entries| entries.iter().find(|c| c.host == host)))
    }

    /// Stored token for `host`, if any
    pub fn token(&mut self, host: &str) -> TrunkResult<Option<String>> {
        Ok(self.get(host)?.map(|c| c.token.clone()))
    }

    /// Store a credential for `host`, replacing any existing one
    pub fn set(&mut self, host: &str, login: &str, token: &str) -> TrunkResult<()> {
        self.ensure_loaded()?;
        if let Some(entries) = self.entries.as_mut() {
            entries.retain(|c| c.host != host);
            entries.push(Credential {
                host: host.to_string(),
                login: login.to_string(),
                token: token.to_string(),
            });
        }
        Ok(())
    }

    /// Remove the credential for `host`, if any
    pub fn delete(&mut self, host: &str) -> TrunkResult<()> {
        self.ensure_loaded()?;
        if let Some(entries) = self.entries.as_mut() {
            entries.retain(|c| c.host != host);
        }
        Ok(())
    }

    /// Rewrite the backing file and flush within one scoped operation.
    /// The file carries credentials, so it is restricted to the owner.
    pub fn save(&mut self) -> TrunkResult<()> {
        self.ensure_loaded()?;
        let text = render(self.entries.as_deref().unwrap_or(&[]));
        let bytes = self.cipher.seal(&text)?;

        let mut file = fs::File::create(&self.path)?;
        file.write_all(&bytes)?;
        file.flush()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = file.metadata()?.permissions();
            perms.set_mode(0o600);
            file.set_permissions(perms)?;
        }

        Ok(())
    }
}

fn parse(text: &str) -> Vec<Credential> {
    // Unparsable lines are ignored on read and dropped on save.
    text.lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, ',').map(str::trim);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(host), Some(login), Some(token)) if !host.is_empty() && !token.is_empty() => {
                    Some(Credential {
                        host: host.to_string(),
                        login: login.to_string(),
                        token: token.to_string(),
                    })
                }
                _ => None,
            }
        })
        .collect()
}

fn render(entries: &[Credential]) -> String {
    entries
        .iter()
        .map(|c| format!("{}, {}, {}\n", c.host, c.login, c.token))
        .collect()
}

/// Resolve the credential file location: the `NETRC` directory override
/// wins, then the home directory. A `.netrc.gpg` present on disk is
/// preferred over the plaintext `.netrc`.
pub fn resolve_path() -> TrunkResult<PathBuf> {
    let dir = std::env::var_os("NETRC")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .ok_or_else(|| {
            TrunkError::Config("Unable to determine the credential file location".to_string())
        })?;
    Ok(resolve_in(&dir))
}

fn resolve_in(dir: &Path) -> PathBuf {
    let encrypted = dir.join(".netrc.gpg");
    if encrypted.exists() {
        encrypted
    } else {
        dir.join(".netrc")
    }
}
