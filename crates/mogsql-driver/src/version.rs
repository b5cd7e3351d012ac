//! Server product and version detection from `select version()`.

use std::sync::OnceLock;

use regex::Regex;

const GAUSSDB: &str = r"(GaussDB|MogDB)\s+Kernel\s+V(\w+)";
const OPENGAUSS: &str = r"(openGauss|MogDB)\s+([^\s]+)";
const KERNEL_RELEASE: &str = r"(\d+)R(\d+)C(\d+)";
#[cfg(feature = "vastbase")]
const VASTBASE: &str = r"(Vastbase\s+G100)\s+V(\d+\.\d+)";

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(pattern, error = %e, "invalid version pattern");
            None
        }
    })
    .as_ref()
}

fn gaussdb() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, GAUSSDB)
}

fn opengauss() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, OPENGAUSS)
}

fn kernel_release() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, KERNEL_RELEASE)
}

#[cfg(feature = "vastbase")]
fn vastbase(banner: &str) -> Option<(String, String)> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    vendor_and_token(compiled(&RE, VASTBASE), banner)
}

#[cfg(not(feature = "vastbase"))]
fn vastbase(_banner: &str) -> Option<(String, String)> {
    None
}

fn vendor_and_token(re: Option<&Regex>, s: &str) -> Option<(String, String)> {
    let caps = re?.captures(s)?;
    let vendor = caps.get(1)?.as_str();
    let token = caps.get(2)?.as_str();
    if token.is_empty() {
        return None;
    }
    Some((vendor.to_string(), token.to_string()))
}

/// `503R1C0` style kernel tokens become `503.1.0`.
fn kernel_version(token: &str) -> Option<String> {
    let caps = kernel_release()?.captures(token)?;
    let mut parts = [0u64; 3];
    for (i, part) in parts.iter_mut().enumerate() {
        *part = caps.get(i + 1)?.as_str().parse().unwrap_or_default();
    }
    Some(format!("{}.{}.{}", parts[0], parts[1], parts[2]))
}

/// Split a server version banner into `(vendor, version)`.
///
/// Returns two empty strings when the banner is not recognised.
pub fn parse_version(banner: &str) -> (String, String) {
    let banner = banner.trim();

    if let Some((vendor, token)) = vendor_and_token(gaussdb(), banner) {
        return match kernel_version(&token) {
            Some(version) => (vendor, version),
            None => (String::new(), String::new()),
        };
    }
    if let Some(found) = vendor_and_token(opengauss(), banner) {
        return found;
    }
    if let Some(found) = vastbase(banner) {
        return found;
    }

    (String::new(), String::new())
}

/// The string shown to users for `banner`: `"<vendor> <version>"`, or the
/// banner itself when it was not recognised.
pub fn display_version(banner: &str) -> String {
    match parse_version(banner) {
        (vendor, version) if vendor.is_empty() && version.is_empty() => banner.trim().to_string(),
        (vendor, version) => format!("{vendor} {version}"),
    }
}
