//! Mobile code-signing secret check.
//!
//! Each logical secret may be supplied under several environment variable
//! names. Names are tried in order and the first one with a non-empty value
//! wins. Values are only tested for presence and never surface in output.

use std::fmt::Write as _;

use serde::Serialize;

/// A logical secret and the variable names that may supply it, in priority order.
#[derive(Debug, Clone, Copy)]
pub struct SecretSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

impl SecretSpec {
    const fn new(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases }
    }
}

/// Secrets a signed build cannot do without.
pub static REQUIRED_SECRETS: &[SecretSpec] = &[
    SecretSpec::new(
        "IOS_CERT_BASE64",
        &[
            "IOS_CERT_BASE64",
            "CM_CERTIFICATE_BASE64",
            "CERTIFICATE_BASE64",
            "IOS_CERT_PATH",
            "IOS_CERT_FILE",
        ],
    ),
    SecretSpec::new(
        "IOS_PROFILE_BASE64",
        &[
            "IOS_PROFILE_BASE64",
            "CM_PROVISIONING_PROFILE_BASE64",
            "PROVISIONING_PROFILE_BASE64",
            "IOS_PROFILE_PATH",
            "IOS_PROFILE_FILE",
        ],
    ),
    SecretSpec::new("IOS_BUNDLE_ID", &["IOS_BUNDLE_ID"]),
];

/// Secrets that enable extra behaviour (export options, store uploads).
pub static OPTIONAL_SECRETS: &[SecretSpec] = &[
    SecretSpec::new("IOS_CERT_PASSWORD", &["IOS_CERT_PASSWORD"]),
    SecretSpec::new("IOS_EXPORT_METHOD", &["IOS_EXPORT_METHOD"]),
    SecretSpec::new("IOS_CODE_SIGN_IDENTITY", &["IOS_CODE_SIGN_IDENTITY"]),
    SecretSpec::new("APPLE_TEAM_ID", &["APPLE_TEAM_ID"]),
    SecretSpec::new(
        "APP_STORE_CONNECT_KEY_ID",
        &["APP_STORE_CONNECT_KEY_ID", "APPSTORECONNECT_KEY_ID"],
    ),
    SecretSpec::new(
        "APP_STORE_CONNECT_ISSUER_ID",
        &["APP_STORE_CONNECT_ISSUER_ID", "APPSTORECONNECT_ISSUER_ID"],
    ),
    SecretSpec::new(
        "APP_STORE_CONNECT_API_KEY_BASE64",
        &["APP_STORE_CONNECT_API_KEY_BASE64", "APPSTORECONNECT_PRIVATE_KEY"],
    ),
];

/// A secret that was found, and the variable that supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSecret {
    pub name: &'static str,
    pub source: &'static str,
}

impl ResolvedSecret {
    /// True when a lower-priority alias supplied the value.
    pub fn via_fallback(&self) -> bool {
        self.name != self.source
    }
}

/// Outcome of resolving a list of secret specs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub ready: Vec<ResolvedSecret>,
    pub missing: Vec<&'static str>,
}

impl Resolution {
    pub fn fallbacks(&self) -> impl Iterator<Item = &ResolvedSecret> {
        self.ready.iter().filter(|s| s.via_fallback())
    }
}

/// Resolve `specs` using `lookup` to read variables.
///
/// A variable that is unset or empty counts as undefined.
pub fn resolve<L>(specs: &[SecretSpec], lookup: L) -> Resolution
where
    L: Fn(&str) -> Option<String>,
{
    let mut resolution = Resolution::default();
    for spec in specs {
        let source = spec
            .aliases
            .iter()
            .copied()
            .find(|&alias| lookup(alias).is_some_and(|v| !v.is_empty()));
        match source {
            Some(source) => resolution.ready.push(ResolvedSecret {
                name: spec.name,
                source,
            }),
            None => resolution.missing.push(spec.name),
        }
    }
    resolution
}

/// Required and optional secrets, resolved together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningCheck {
    pub required: Resolution,
    pub optional: Resolution,
}

impl SigningCheck {
    pub fn resolve_with<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        Self {
            required: resolve(REQUIRED_SECRETS, &lookup),
            optional: resolve(OPTIONAL_SECRETS, &lookup),
        }
    }

    /// Resolve against the process environment.
    pub fn from_env() -> Self {
        Self::resolve_with(|name| std::env::var(name).ok())
    }

    /// All required secrets are present.
    pub fn is_complete(&self) -> bool {
        self.required.missing.is_empty()
    }

    /// Human-readable report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Codemagic signing environment check");
        let _ = writeln!(out, "===============================");

        if !self.required.ready.is_empty() {
            let _ = writeln!(out, "Ready to use:");
            write_ready(&mut out, &self.required.ready);
            let _ = writeln!(out);
        }

        if !self.required.missing.is_empty() {
            let _ = writeln!(out, "Missing required values:");
            for name in &self.required.missing {
                let _ = writeln!(out, " • {name}");
            }
            let _ = writeln!(
                out,
                "Add these to the ios_signing group in Codemagic or export them in your shell before running the workflow."
            );
            let _ = writeln!(out);
        }

        if self.optional.ready.is_empty() {
            let _ = writeln!(out, "Optional values: (none found)");
            let _ = writeln!(
                out,
                "Tip: Provide APP_STORE_CONNECT_* variables to enable automatic TestFlight uploads without UDIDs."
            );
        } else {
            let _ = writeln!(out, "Optional values detected:");
            write_ready(&mut out, &self.optional.ready);
        }
        let _ = writeln!(out);

        let mut fallbacks = self.required.fallbacks().chain(self.optional.fallbacks()).peekable();
        if fallbacks.peek().is_some() {
            let _ = writeln!(out, "Fallback sources in use:");
            for secret in fallbacks {
                let _ = writeln!(out, " • {} provided via {}", secret.name, secret.source);
            }
            let _ = writeln!(out);
        }

        if self.is_complete() {
            let _ = writeln!(out, "✅ All required Codemagic signing secrets are present.");
        } else {
            let _ = writeln!(out, "❌ Codemagic signing secrets are incomplete.");
        }
        out
    }
}

fn write_ready(out: &mut String, ready: &[ResolvedSecret]) {
    for secret in ready {
        if secret.via_fallback() {
            let _ = writeln!(out, " • {} (via {})", secret.name, secret.source);
        } else {
            let _ = writeln!(out, " • {}", secret.name);
        }
    }
}
