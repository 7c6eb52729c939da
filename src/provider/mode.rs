use std::fmt;
use std::str::FromStr;

use phf::phf_set;
use serde::Serialize;
use thiserror::Error;

/// MX hosts of Google Workspace domains. `googlemail.com` is the legacy name.
pub static WORKSPACE_MX_HOSTS: phf::Set<&'static str> = phf_set! {
    "aspmx.l.google.com",
    "googlemail.com",
};

/// MX hosts of consumer Gmail.
pub static GMAIL_MX_HOSTS: phf::Set<&'static str> = phf_set! {
    "gmail-smtp-in.l.google.com",
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMode {
    Gmail,
    Workspace,
    #[default]
    Google,
}

impl ClassificationMode {
    pub const ALL: [ClassificationMode; 3] = [Self::Gmail, Self::Workspace, Self::Google];

    /// Unknown or empty tags fall back to [`ClassificationMode::Google`].
    pub fn from_tag(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.parse().ok()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gmail => "gmail",
            Self::Workspace => "workspace",
            Self::Google => "google",
        }
    }

    /// Provider MX hosts tested for this mode.
    pub fn hosts(&self) -> Vec<&'static str> {
        match self {
            Self::Gmail => GMAIL_MX_HOSTS.iter().copied().collect(),
            Self::Workspace => WORKSPACE_MX_HOSTS.iter().copied().collect(),
            Self::Google => WORKSPACE_MX_HOSTS
                .iter()
                .chain(GMAIL_MX_HOSTS.iter())
                .copied()
                .collect(),
        }
    }
}

impl fmt::Display for ClassificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown classification mode '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for ClassificationMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gmail" => Ok(Self::Gmail),
            "workspace" => Ok(Self::Workspace),
            "google" => Ok(Self::Google),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}
