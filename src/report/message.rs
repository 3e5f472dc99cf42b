//! Chat message generation.
//!
//! This module renders a weekly snapshot as Slack `mrkdwn` text: header with
//! the week-over-week trend, per-platform bars, winning prompts, visibility
//! gaps and a footer.

use crate::config::Config;
use crate::models::{Platform, PlatformStats, PromptHits, Snapshot, Summary};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const BAR_CELLS: i64 = 10;

/// Layout settings for the report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub brand_name: String,
    pub max_winning: usize,
    pub max_gaps: usize,
    pub prompt_width: usize,
    pub category_priority: Vec<String>,
}

impl From<&Config> for ReportOptions {
    fn from(config: &Config) -> Self {
        Self {
            brand_name: config.brand.name.clone(),
            max_winning: config.report.max_winning,
            max_gaps: config.report.max_gaps,
            prompt_width: config.report.prompt_width,
            category_priority: config.report.category_priority.clone(),
        }
    }
}

/// Direction of the week-over-week change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaIndicator {
    Up(i64),
    Down(i64),
    Flat,
    Baseline,
}

impl DeltaIndicator {
    pub fn from_delta(delta: Option<i64>) -> Self {
        match delta {
            None => DeltaIndicator::Baseline,
            Some(d) if d > 0 => DeltaIndicator::Up(d),
            Some(d) if d < 0 => DeltaIndicator::Down(d),
            Some(_) => DeltaIndicator::Flat,
        }
    }

    pub fn render(&self) -> String {
        match self {
            DeltaIndicator::Up(d) => format!("↑ +{}% vs last week 🟢", d),
            DeltaIndicator::Down(d) => format!("↓ {}% vs last week 🔴", d),
            DeltaIndicator::Flat => "→ flat vs last week 🟡".to_string(),
            DeltaIndicator::Baseline => "_baseline week — tracking starts now_".to_string(),
        }
    }
}

/// Render the full report.
pub fn format_report(snapshot: &Snapshot, options: &ReportOptions) -> String {
    let summary = &snapshot.summary;
    let mut lines = Vec::new();

    lines.extend(generate_header(&snapshot.week, summary, options));
    lines.push(String::new());
    lines.extend(generate_platform_section(summary));
    lines.push(String::new());
    lines.extend(generate_winning_section(&summary.winning_prompts, options));
    lines.push(String::new());
    lines.extend(generate_gap_section(&summary.gap_prompts, options));
    lines.push(String::new());
    lines.push(generate_footer(snapshot));

    lines.join("\n")
}

fn generate_header(week: &str, summary: &Summary, options: &ReportOptions) -> Vec<String> {
    vec![
        format!(
            "🚛 *{} AI Visibility Report* — Week of {}",
            options.brand_name, week
        ),
        RULE.to_string(),
        format!(
            "*Overall: {}/{} prompts ({}%)* — {}",
            summary.total_hits,
            summary.total_queries,
            summary.overall_pct,
            DeltaIndicator::from_delta(summary.wow_delta).render()
        ),
    ]
}

fn generate_platform_section(summary: &Summary) -> Vec<String> {
    let mut lines = vec!["*By Platform:*".to_string()];
    for (platform, stats) in &summary.per_platform {
        lines.push(platform_line(*platform, stats));
    }
    lines
}

fn platform_line(platform: Platform, stats: &PlatformStats) -> String {
    format!(
        "  • {}: {}/{} ({}%)  `{}`",
        platform.label(),
        stats.hits,
        stats.total,
        stats.pct,
        percent_bar(stats.pct)
    )
}

/// Ten-cell bar, one filled cell per full 10%.
pub fn percent_bar(pct: i64) -> String {
    let filled = (pct / 10).clamp(0, BAR_CELLS) as usize;
    let empty = BAR_CELLS as usize - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

fn generate_winning_section(winning: &[PromptHits], options: &ReportOptions) -> Vec<String> {
    if winning.is_empty() {
        return vec![format!(
            "*✅ Prompts Where {} Appeared:* None this week — keep publishing!",
            options.brand_name
        )];
    }

    let mut lines = vec![format!("*✅ Prompts Where {} Appeared:*", options.brand_name)];
    for hit in winning.iter().take(options.max_winning) {
        let platforms: Vec<&str> = hit.platforms.iter().map(Platform::key).collect();
        lines.push(format!(
            "  • _{}_ ({})",
            truncate(&hit.prompt, options.prompt_width),
            platforms.join(", ")
        ));
    }
    lines
}

fn generate_gap_section(gaps: &[PromptHits], options: &ReportOptions) -> Vec<String> {
    let mut lines = vec![format!(
        "*❌ Visibility Gaps — {} prompts with no mention:*",
        gaps.len()
    )];

    let sorted = sort_by_priority(gaps, &options.category_priority);
    for gap in sorted.iter().take(options.max_gaps) {
        lines.push(format!(
            "  • _{}_ ({})",
            truncate(&gap.prompt, options.prompt_width),
            gap.category
        ));
    }
    if sorted.len() > options.max_gaps {
        lines.push(format!("  _...and {} more_", sorted.len() - options.max_gaps));
    }
    lines
}

/// Stable sort by position in `priority`; unknown categories go last.
pub fn sort_by_priority<'a>(gaps: &'a [PromptHits], priority: &[String]) -> Vec<&'a PromptHits> {
    let rank = |category: &str| {
        priority
            .iter()
            .position(|p| p == category)
            .unwrap_or(usize::MAX)
    };

    let mut sorted: Vec<&PromptHits> = gaps.iter().collect();
    sorted.sort_by_key(|g| rank(&g.category));
    sorted
}

fn generate_footer(snapshot: &Snapshot) -> String {
    let labels: Vec<&str> = snapshot.platforms.keys().map(Platform::label).collect();
    format!(
        "_Platforms: {} · {} prompts each · {} total queries_",
        labels.join(" · "),
        snapshot.prompts_per_platform(),
        snapshot.summary.total_queries
    )
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{summarize, PlatformRecords};
    use crate::models::ResponseRecord;

    fn default_options() -> ReportOptions {
        ReportOptions::from(&Config::default())
    }

    fn record(prompt: &str, category: &str, mentioned: bool) -> ResponseRecord {
        ResponseRecord {
            category: category.to_string(),
            prompt: prompt.to_string(),
            mentioned,
            error: false,
            response_snippet: String::new(),
        }
    }

    /// Snapshot over `prompts`, with ChatGPT mentioning the brand for `hits`.
    fn create_test_snapshot(prompts: &[(&str, &str)], hits: &[&str], previous: Option<i64>) -> Snapshot {
        let records: PlatformRecords = Platform::ALL
            .iter()
            .map(|&platform| {
                let list = prompts
                    .iter()
                    .map(|(category, prompt)| {
                        let mentioned = platform == Platform::ChatGpt && hits.contains(prompt);
                        record(prompt, category, mentioned)
                    })
                    .collect();
                (platform, list)
            })
            .collect();

        let summary = summarize(&records, previous);
        Snapshot {
            week: "2026-10-12".to_string(),
            platforms: records,
            summary,
        }
    }

    fn two_prompt_snapshot(previous: Option<i64>) -> Snapshot {
        create_test_snapshot(
            &[("Public Safety", "p1"), ("Competitive", "p2")],
            &["p1"],
            previous,
        )
    }

    #[test]
    fn test_delta_indicators() {
        assert_eq!(DeltaIndicator::from_delta(Some(5)), DeltaIndicator::Up(5));
        assert_eq!(DeltaIndicator::from_delta(Some(-3)), DeltaIndicator::Down(-3));
        assert_eq!(DeltaIndicator::from_delta(Some(0)), DeltaIndicator::Flat);
        assert_eq!(DeltaIndicator::from_delta(None), DeltaIndicator::Baseline);
    }

    #[test]
    fn test_header_trend_text() {
        let options = default_options();

        // overall is 17%; previous values chosen to give +5, -3 and 0.
        let up = format_report(&two_prompt_snapshot(Some(12)), &options);
        assert!(up.contains("↑ +5% vs last week 🟢"));

        let down = format_report(&two_prompt_snapshot(Some(20)), &options);
        assert!(down.contains("↓ -3% vs last week 🔴"));

        let flat = format_report(&two_prompt_snapshot(Some(17)), &options);
        assert!(flat.contains("→ flat vs last week 🟡"));

        let baseline = format_report(&two_prompt_snapshot(None), &options);
        assert!(baseline.contains("baseline week"));
    }

    #[test]
    fn test_report_sections() {
        let report = format_report(&two_prompt_snapshot(None), &default_options());

        assert!(report.starts_with("🚛 *fleetTEC AI Visibility Report* — Week of 2026-10-12"));
        assert!(report.contains("*Overall: 1/6 prompts (17%)*"));
        assert!(report.contains("  • ChatGPT: 1/2 (50%)  `█████░░░░░`"));
        assert!(report.contains("  • Claude: 0/2 (0%)  `░░░░░░░░░░`"));
        assert!(report.contains("  • _p1_ (chatgpt)"));
        assert!(report.contains("*❌ Visibility Gaps — 1 prompts with no mention:*"));
        assert!(report.contains("  • _p2_ (Competitive)"));
        assert!(report.ends_with(
            "_Platforms: ChatGPT · Claude · Gemini · 2 prompts each · 6 total queries_"
        ));
    }

    #[test]
    fn test_no_winning_prompts_line() {
        let snapshot = create_test_snapshot(&[("Competitive", "p1")], &[], None);
        let report = format_report(&snapshot, &default_options());
        assert!(report.contains("None this week — keep publishing!"));
    }

    #[test]
    fn test_gaps_sorted_by_priority_and_capped() {
        let prompts = [
            ("Competitive", "c1"),
            ("Unlisted", "u1"),
            ("Public Safety", "s1"),
            ("Mobile/Transit", "m1"),
            ("Competitive", "c2"),
            ("Energy/Utility", "e1"),
            ("Partner Channel", "pc1"),
            ("Public Safety", "s2"),
        ];
        let snapshot = create_test_snapshot(&prompts, &[], None);
        let options = default_options();

        let sorted = sort_by_priority(&snapshot.summary.gap_prompts, &options.category_priority);
        let sorted: Vec<&str> = sorted.iter().map(|g| g.prompt.as_str()).collect();
        assert_eq!(sorted, vec!["s1", "s2", "e1", "m1", "pc1", "c1", "c2", "u1"]);

        let report = format_report(&snapshot, &options);
        assert!(report.contains("  • _c1_ (Competitive)"));
        assert!(!report.contains("  • _c2_ (Competitive)"));
        assert!(report.contains("  _...and 2 more_"));
    }

    #[test]
    fn test_winning_prompts_capped_and_truncated() {
        let long = "x".repeat(100);
        let mut prompts: Vec<(&str, &str)> = vec![("Competitive", long.as_str())];
        let names: Vec<String> = (0..9).map(|i| format!("w{}", i)).collect();
        prompts.extend(names.iter().map(|n| ("Competitive", n.as_str())));
        let mut hits: Vec<&str> = names.iter().map(String::as_str).collect();
        hits.push(long.as_str());

        let snapshot = create_test_snapshot(&prompts, &hits, None);
        let report = format_report(&snapshot, &default_options());

        assert!(report.contains(&format!("  • _{}_ (chatgpt)", "x".repeat(72))));
        assert!(report.contains("_w6_"));
        assert!(!report.contains("_w7_"));
    }

    #[test]
    fn test_percent_bar() {
        assert_eq!(percent_bar(0), "░░░░░░░░░░");
        assert_eq!(percent_bar(39), "███░░░░░░░");
        assert_eq!(percent_bar(100), "██████████");
    }

    #[test]
    fn test_custom_brand_name() {
        let options = ReportOptions {
            brand_name: "Acme".to_string(),
            ..default_options()
        };
        let report = format_report(&two_prompt_snapshot(None), &options);
        assert!(report.contains("*Acme AI Visibility Report*"));
        assert!(report.contains("*✅ Prompts Where Acme Appeared:*"));
    }
}
