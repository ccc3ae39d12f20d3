use std::collections::HashMap;
use std::io::BufRead;
use std::path::PathBuf;

use tracing::debug;

use super::{normalize_repository_url, Profile};
use crate::core::maven::scanner::{ConfigScanner, ScanEvent, ScanResult};

/// Values collected from a settings document before defaults and
/// environment overrides are layered on top.
#[derive(Debug, Default)]
pub(super) struct SettingsDraft {
    pub local_repository: Option<PathBuf>,
    pub profiles: HashMap<String, Profile>,
    pub active_profiles: Vec<String>,
}

/// Walk the document and fill `draft` from every top-level `<settings>`.
pub(super) fn parse_document<R: BufRead>(source: R, draft: &mut SettingsDraft) -> ScanResult<()> {
    let mut scanner = ConfigScanner::new(source);
    loop {
        match scanner.next()? {
            ScanEvent::EndOfDocument => return Ok(()),
            ScanEvent::StartTag if scanner.current_tag_name() == "settings" => {
                parse_settings(&mut scanner, draft)?
            }
            _ => {}
        }
    }
}

fn parse_settings<R: BufRead>(
    scanner: &mut ConfigScanner<R>,
    draft: &mut SettingsDraft,
) -> ScanResult<()> {
    // Once a localRepository has been read, bare <profile> siblings are accepted too.
    let mut after_local_repository = false;

    while scanner.next_tag("settings")? == ScanEvent::StartTag {
        let name = scanner.current_tag_name().to_owned();
        match name.as_str() {
            "localRepository" => {
                draft.local_repository = Some(PathBuf::from(scanner.read_text()?));
                after_local_repository = true;
            }
            "profiles" => {
                parse_children(scanner, "profiles", "profile", |s| parse_profile(s, draft))?
            }
            "profile" if after_local_repository => parse_profile(scanner, draft)?,
            "activeProfiles" => parse_children(scanner, "activeProfiles", "activeProfile", |s| {
                draft.active_profiles.push(s.read_text()?);
                Ok(())
            })?,
            _ => scanner.skip_subtree()?,
        }
    }
    Ok(())
}

fn parse_profile<R: BufRead>(
    scanner: &mut ConfigScanner<R>,
    draft: &mut SettingsDraft,
) -> ScanResult<()> {
    let mut id = None;
    let mut repositories = Vec::new();

    while scanner.next_tag("profile")? == ScanEvent::StartTag {
        let name = scanner.current_tag_name().to_owned();
        match name.as_str() {
            "id" => id = Some(scanner.read_text()?),
            "repositories" => parse_children(scanner, "repositories", "repository", |s| {
                parse_repository(s, &mut repositories)
            })?,
            "repository" => parse_repository(scanner, &mut repositories)?,
            _ => scanner.skip_subtree()?,
        }
    }

    match id {
        Some(id) => {
            draft
                .profiles
                .insert(id.clone(), Profile { id, repositories });
        }
        None => debug!("Discarding settings profile without an id"),
    }
    Ok(())
}

fn parse_repository<R: BufRead>(
    scanner: &mut ConfigScanner<R>,
    urls: &mut Vec<String>,
) -> ScanResult<()> {
    parse_children(scanner, "repository", "url", |s| {
        urls.push(normalize_repository_url(&s.read_text()?));
        Ok(())
    })
}

/// Hand every `child` element of `container` to `each`, skipping anything
/// else, until the container's end tag.
fn parse_children<R: BufRead>(
    scanner: &mut ConfigScanner<R>,
    container: &str,
    child: &str,
    mut each: impl FnMut(&mut ConfigScanner<R>) -> ScanResult<()>,
) -> ScanResult<()> {
    while scanner.next_tag(container)? == ScanEvent::StartTag {
        if scanner.current_tag_name() == child {
            each(scanner)?;
        } else {
            scanner.skip_subtree()?;
        }
    }
    Ok(())
}
