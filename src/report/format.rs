//! Formatted terminal output.
//!
//! Every table carries its provenance in the header line so a synthetic
//! series can never be mistaken for live data.

use crate::config::CredentialStatus;
use crate::domain::{AwardList, MetricSeries, Provenance, ProviderKind};
use crate::report::{Card, DashboardSummary, SeriesSummary, percent_changes};

/// Series header plus one row per observation.
pub fn format_series_table(series: &MetricSeries) -> String {
    let mut out = String::new();
    let metric = series.metric_id();

    out.push_str(&format!(
        "=== {} ({}) | {} ===\n",
        metric.display_name(),
        series.region(),
        metric.unit_label()
    ));
    out.push_str(&format!("Source: {}{}\n\n", series.source_name(), provenance_tag(series.provenance())));

    out.push_str(format!("{:<12} {:>16} {:>10}\n", "date", "value", "change%").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<16} {:-<10}\n", "", "", "").trim_end());
    out.push('\n');

    for (p, change) in series.points().iter().zip(percent_changes(series)) {
        let change = change.map(|c| format!("{c:+.2}")).unwrap_or_else(|| "-".to_string());
        let row = format!("{:<12} {:>16} {:>10}\n", p.date.to_string(), fmt_value(p.value), change);
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out
}

pub fn format_series_summary(summary: &SeriesSummary) -> String {
    format!(
        "n={} | min={} | max={} | mean={} | latest={} | change={}\n",
        summary.n_points,
        fmt_value(summary.min),
        fmt_value(summary.max),
        fmt_value(summary.mean),
        fmt_value(summary.latest),
        summary
            .total_change_pct
            .map(|c| format!("{c:+.2}%"))
            .unwrap_or_else(|| "n/a".to_string()),
    )
}

/// The overview cards.
pub fn format_dashboard(dash: &DashboardSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Construction overview: {} ===\n", dash.region));

    out.push_str(&card_line("Construction employment", &dash.employment, |v| format!("{v:.0}")));
    out.push_str(&card_line("Employment growth", &dash.employment_growth_pct, |v| {
        format!("{v:+.2}%")
    }));
    out.push_str(&card_line("Average hourly wage", &dash.average_wage, |v| format!("${v:.2}")));
    out.push_str(&card_line("Unemployment rate", &dash.unemployment_rate, |v| format!("{v:.1}%")));
    out.push_str(&card_line("Labor force", &dash.labor_force, |v| format!("{v:.0}")));
    out.push_str(&card_line("Federal construction spending", &dash.total_spending, fmt_dollars));
    out.push_str(&format!("{:<30} {:>18}\n", "Contracts", dash.contract_count));

    if dash.any_synthetic() {
        out.push_str("\nFigures tagged [synthetic] are generated fallbacks, not provider data.\n");
    }
    out
}

fn card_line(label: &str, card: &Card, fmt: impl Fn(f64) -> String) -> String {
    let value = card.value.map(fmt).unwrap_or_else(|| "unavailable".to_string());
    let tag = card.provenance.map(provenance_tag).unwrap_or_default();
    format!("{label:<30} {value:>18}{tag}\n")
}

/// Top `top` awards as a table.
pub fn format_awards(list: &AwardList, top: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== Federal construction awards: {} ===\nSource: {}{}\n",
        list.region,
        list.source_name,
        provenance_tag(list.provenance)
    ));
    out.push_str(&format!(
        "Contracts: {} | Total obligation: {}\n\n",
        list.awards.len(),
        fmt_dollars(list.total_obligation())
    ));

    let header = format!("{:<32} {:>16} {:<12} {:<24}\n", "recipient", "obligation", "date", "naics");
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(format!("{:-<32} {:-<16} {:-<12} {:-<24}\n", "", "", "", "").trim_end());
    out.push('\n');

    for a in list.awards.iter().take(top) {
        out.push_str(
            format!(
                "{:<32} {:>16} {:<12} {:<24}\n",
                truncate(&a.recipient_name, 32),
                fmt_dollars(a.total_obligation),
                a.award_date.to_string(),
                truncate(&a.naics_description, 24),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

pub fn format_credential_report(report: &[(ProviderKind, CredentialStatus)]) -> String {
    let mut out = String::from("Provider credentials:\n");
    for (kind, status) in report {
        let label = match status {
            CredentialStatus::Configured => "configured",
            CredentialStatus::Placeholder => "NOT CONFIGURED (synthetic fallback)",
            CredentialStatus::NotRequired => "no key required",
        };
        out.push_str(&format!("  {:<32} {label}\n", kind.display_name()));
    }
    out
}

fn provenance_tag(p: Provenance) -> &'static str {
    match p {
        Provenance::Real => "",
        Provenance::Synthetic => " [synthetic]",
    }
}

fn fmt_value(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn fmt_dollars(v: f64) -> String {
    if v.abs() >= 1e9 {
        format!("${:.2}B", v / 1e9)
    } else if v.abs() >= 1e6 {
        format!("${:.1}M", v / 1e6)
    } else {
        format!("${v:.0}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
