use anyhow::Result;
use serde_json::json;

use crate::workflow::SessionReport;

/// Print a plain-text representation of the session outcome.
pub(crate) fn print_plain(report: &SessionReport) {
    if !report.accepted {
        println!("Search cancelled (query: '{}')", report.query);
        return;
    }

    match &report.url {
        Some(url) => println!("{url}"),
        None => println!("No navigation"),
    }
}

/// Format the session outcome as a JSON string.
pub(crate) fn format_report_json(report: &SessionReport) -> Result<String> {
    let payload = json!({
        "accepted": report.accepted,
        "query": report.query,
        "url": report.url,
        "slug": report.slug,
        "views": report.views,
    });

    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Print the JSON representation of the session outcome.
pub(crate) fn print_json(report: &SessionReport) -> Result<()> {
    println!("{}", format_report_json(report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    #[test]
    fn json_format_includes_navigation_fields() {
        let report = SessionReport {
            accepted: true,
            query: "Almás pite".into(),
            url: Some("/search?query=Alm%C3%A1s%20pite".into()),
            slug: Some("almas-pite".into()),
            views: Some(42),
        };

        let json = format_report_json(&report).expect("json");
        let value: Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["accepted"], true);
        assert_eq!(value["url"], "/search?query=Alm%C3%A1s%20pite");
        assert_eq!(value["views"], 42);
    }

    #[test]
    fn cancelled_sessions_serialize_null_navigation() {
        let report = SessionReport {
            accepted: false,
            query: "túrós".into(),
            url: None,
            slug: None,
            views: None,
        };

        let json = format_report_json(&report).expect("json");
        let value: Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["accepted"], false);
        assert!(value["url"].is_null());
    }
}
