use anyhow::Result;
use armtc_core::UrlResolver;
use armtc_core::catalog::{self, ReleaseEntry};
use armtc_schema::Platform;
use serde::Serialize;

const PLATFORMS: [Platform; 3] = [Platform::Linux, Platform::Windows, Platform::Darwin];

#[derive(Debug, Serialize)]
struct ReleaseRow {
    version: String,
    platforms: Vec<Platform>,
    checksum: bool,
    latest: bool,
}

fn rows() -> Vec<ReleaseRow> {
    let resolver = UrlResolver::default();
    let latest = catalog::latest_version();

    catalog::entries()
        .iter()
        .map(|entry: &ReleaseEntry| {
            let version = entry.version();
            let release = version.to_string();
            ReleaseRow {
                platforms: PLATFORMS
                    .into_iter()
                    .filter(|p| resolver.resolve(&release, *p).is_ok())
                    .collect(),
                checksum: catalog::has_checksum(&version),
                latest: version == latest,
                version: release,
            }
        })
        .collect()
}

/// List catalog releases, newest first.
pub fn list(json: bool) -> Result<()> {
    let rows = rows();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:<10} {:<22} {:<8}", "RELEASE", "PLATFORMS", "SHA256");
    for row in &rows {
        let platforms = row
            .platforms
            .iter()
            .map(Platform::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let marker = if row.latest { "  (latest)" } else { "" };
        let checksum = if row.checksum { "yes" } else { "no" };
        println!("{:<10} {platforms:<22} {checksum:<8}{marker}", row.version);
    }
    Ok(())
}
