//! UniProt REST endpoint URL builders
//!
//! Helper functions to construct the ID-mapping and UniProtKB URLs, plus
//! parsing of the pagination headers the service returns.

use url::Url;

/// Build job submission URL
pub fn run_url(base_url: &str) -> String {
    format!("{}/idmapping/run", base_url)
}

/// Build job status URL
pub fn status_url(base_url: &str, job_id: &str) -> String {
    format!("{}/idmapping/status/{}", base_url, job_id)
}

/// Build job details URL
pub fn details_url(base_url: &str, job_id: &str) -> String {
    format!("{}/idmapping/details/{}", base_url, job_id)
}

/// Result collection a target database is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCollection {
    UniProtKb,
    UniParc,
    UniRef,
    Plain,
}

impl ResultCollection {
    pub fn for_target(target_database: &str) -> Self {
        match target_database {
            "UniProtKB" | "UniProtKB-Swiss-Prot" => ResultCollection::UniProtKb,
            "UniParc" => ResultCollection::UniParc,
            t if t.starts_with("UniRef") => ResultCollection::UniRef,
            _ => ResultCollection::Plain,
        }
    }

    /// Collection a results URL points into
    pub fn for_results_url(url: &str) -> Self {
        if url.contains("/idmapping/uniprotkb/") {
            ResultCollection::UniProtKb
        } else if url.contains("/idmapping/uniparc/") {
            ResultCollection::UniParc
        } else if url.contains("/idmapping/uniref/") {
            ResultCollection::UniRef
        } else {
            ResultCollection::Plain
        }
    }

    /// Whether the collection honours the `fields` parameter
    pub fn accepts_fields(self) -> bool {
        self == ResultCollection::UniProtKb
    }
}

/// Build the first-page results URL for a finished job
pub fn results_url(base_url: &str, target_database: &str, job_id: &str) -> String {
    match ResultCollection::for_target(target_database) {
        ResultCollection::UniProtKb => {
            format!("{}/idmapping/uniprotkb/results/{}", base_url, job_id)
        }
        ResultCollection::UniParc => format!("{}/idmapping/uniparc/results/{}", base_url, job_id),
        ResultCollection::UniRef => format!("{}/idmapping/uniref/results/{}", base_url, job_id),
        ResultCollection::Plain => format!("{}/idmapping/results/{}", base_url, job_id),
    }
}

/// Move a details `redirectURL` onto `base_url`
///
/// Keeps the `/idmapping/...` path; host and query are dropped.
pub fn rebase_results_url(base_url: &str, redirect_url: &str) -> Option<String> {
    let url = Url::parse(redirect_url).ok()?;
    let path = url.path();
    let start = path.find("/idmapping/")?;
    Some(format!("{}{}", base_url, &path[start..]))
}

/// Build UniProtKB search URL
pub fn kb_search_url(base_url: &str) -> String {
    format!("{}/uniprotkb/search", base_url)
}

/// Extract the `rel="next"` target from a `Link` header
///
/// The header may list several links; targets may themselves contain commas.
pub fn next_link(link_header: &str) -> Option<String> {
    let mut rest = link_header;
    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let end = after.find('>')?;
        let target = &after[..end];
        let tail = &after[end + 1..];
        let params = tail.split('<').next().unwrap_or_default();

        let is_next = params.split(';').any(|p| {
            let p = p.trim().trim_end_matches(',').replace([' ', '"'], "");
            p == "rel=next"
        });
        if is_next {
            return Some(target.to_string());
        }
        rest = tail;
    }
    None
}

/// Cursor token of the next page, taken from the `Link` header
pub fn next_cursor(link_header: &str) -> Option<String> {
    let link = next_link(link_header)?;
    let url = Url::parse(&link).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "cursor")
        .map(|(_, v)| v.into_owned())
}
