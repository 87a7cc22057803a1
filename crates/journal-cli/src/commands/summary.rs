//! 사람이 읽는 요약 출력.
//!
//! 분석 엔진은 숫자와 지표 종류(`Metric`)만 제공하고,
//! 단위와 소수점 같은 형식은 여기서 정합니다.

use journal_analytics::{DrawdownSummary, FilteredReport, SideStreaks};
use journal_core::Metric;
use std::fmt;

/// 지표 값을 문자열로 형식화합니다.
pub fn format_metric(metric: &Metric) -> String {
    match metric {
        Metric::Count(n) => n.to_string(),
        Metric::Ratio(v) => format!("{:.2} / {:.2}", v.pips, v.value),
        Metric::Currency(v) => format!("{:.1} pips / {:.1} vpips", v.pips, v.value),
        Metric::Percent(p) => format!("{:.1}%", p),
        Metric::Duration(bars) => format!("{:.1} bars", bars),
        Metric::Timestamp(t) => t.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}

/// 필터 리포트의 요약 뷰.
pub struct SummaryView<'a>(pub &'a FilteredReport);

impl fmt::Display for SummaryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let FilteredReport { report, filter, .. } = self.0;

        let pairs = if filter.included_pairs.is_empty() {
            "all pairs".to_string()
        } else {
            filter
                .included_pairs
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(",")
        };
        writeln!(f, "Range: {}  Pairs: {}", filter.range, pairs)?;
        writeln!(f)?;

        if report.trades.is_empty() {
            return writeln!(f, "No trades match the current filter.");
        }

        writeln!(f, "{:<22} {:>32} {:>32} {:>32}", "Metric", "All", "Long", "Short")?;
        let groups = &report.groups;
        for ((key, all), ((_, long), (_, short))) in groups.all.metrics().into_iter().zip(
            groups
                .long
                .metrics()
                .into_iter()
                .zip(groups.short.metrics()),
        ) {
            writeln!(
                f,
                "{:<22} {:>32} {:>32} {:>32}",
                key.label(),
                format_metric(&all),
                format_metric(&long),
                format_metric(&short)
            )?;
        }

        writeln!(f)?;
        write_drawdown(f, "Drawdown (pips)", &report.drawdown.pips)?;
        write_drawdown(f, "Drawdown (value)", &report.drawdown.value)?;

        writeln!(f)?;
        writeln!(f, "Streaks (min length {})", report.streaks.min_length)?;
        write_streaks(f, "win", &report.streaks.win)?;
        write_streaks(f, "loss", &report.streaks.loss)?;

        writeln!(f)?;
        writeln!(f, "Months")?;
        for month in &report.rollup.months {
            let best = month
                .best_pair
                .as_ref()
                .map(|p| p.pair.as_str())
                .unwrap_or("-");
            writeln!(
                f,
                "  {}  trades {:>3}  win {:>5.1}%  net {:>9.1} pips  best {}",
                month.key, month.trade_count, month.win_rate_pct, month.net.pips, best
            )?;
        }

        let summary = &report.rollup.summary;
        writeln!(
            f,
            "  {} months, {:.1} trades/month, {:.1}% positive, {:.1}% on target",
            summary.months_elapsed,
            summary.avg_trades_per_month,
            summary.positive_month_pct,
            summary.target_hit_pct
        )?;

        writeln!(f)?;
        writeln!(f, "Pairs")?;
        for total in &report.pair_totals {
            writeln!(
                f,
                "  {:<8} trades {:>3}  wins {:>3}  net {:>9.1} pips / {:>9.1} vpips",
                total.pair, total.trade_count, total.wins, total.net.pips, total.net.value
            )?;
        }

        Ok(())
    }
}

fn write_drawdown(f: &mut fmt::Formatter<'_>, title: &str, dd: &DrawdownSummary) -> fmt::Result {
    writeln!(
        f,
        "{}: max {:.1}, avg {:.1}, episodes {} ({} open), current {:.1}, avg recovery {:.1}h",
        title,
        dd.max_drawdown,
        dd.avg_drawdown,
        dd.episode_count,
        dd.open_episodes,
        dd.current_drawdown,
        dd.avg_recovery_hours
    )?;
    if let Some(deepest) = dd.deepest_episode() {
        let marks = deepest
            .time_marks()
            .iter()
            .map(|(label, metric)| format!("{} {}", label, format_metric(metric)))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "  deepest: {}", marks)?;
    }
    Ok(())
}

fn write_streaks(f: &mut fmt::Formatter<'_>, side: &str, streaks: &SideStreaks) -> fmt::Result {
    let counts = streaks
        .counts
        .iter()
        .map(|(length, count)| format!("{}x{}", length, count))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(
        f,
        "  {:<5} longest {:>2}  {}",
        side,
        streaks.longest,
        if counts.is_empty() { "-" } else { counts.as_str() }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use journal_core::PipValue;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_metric() {
        assert_eq!(format_metric(&Metric::Count(7)), "7");
        assert_eq!(format_metric(&Metric::Percent(dec!(62.5))), "62.5%");
        assert_eq!(
            format_metric(&Metric::Currency(PipValue::new(dec!(50), dec!(33.5)))),
            "50.0 pips / 33.5 vpips"
        );
        assert_eq!(
            format_metric(&Metric::Ratio(PipValue::new(dec!(2), dec!(1.5)))),
            "2.00 / 1.50"
        );
        assert_eq!(format_metric(&Metric::Duration(dec!(3))), "3.0 bars");
        assert_eq!(
            format_metric(&Metric::Timestamp(
                Utc.with_ymd_and_hms(2024, 3, 8, 21, 5, 0).unwrap()
            )),
            "2024-03-08 21:05 UTC"
        );
    }
}
