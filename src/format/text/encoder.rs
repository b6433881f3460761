//! Line-by-line rendering of a [`MetricSnapshot`] in either text profile.

use std::fmt::{self, Write as _};

use super::{
    config::{header_name, type_keyword, ProfileConfig},
    names::{escape_help, escape_label_value},
};
use crate::{
    error::Result,
    format::profile::TextProfile,
    raw::{exemplar::Exemplar, labels::Labels, metadata::Metadata, MetricType},
    snapshot::{BucketValue, DataRecord, MetricData, MetricSnapshot},
};

fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf".to_string() } else { "-Inf".to_string() };
    }
    let mut buf = dtoa::Buffer::new();
    let rendered = buf.format(value);
    rendered.strip_suffix(".0").unwrap_or(rendered).to_string()
}

// Sums retain a trailing `.0` for whole numbers, unlike every other rendered value.
fn format_sum(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf".to_string() } else { "-Inf".to_string() };
    }
    let mut buf = dtoa::Buffer::new();
    let rendered = buf.format(value);
    if rendered.contains(['.', 'e', 'E']) {
        rendered.to_string()
    } else {
        format!("{rendered}.0")
    }
}

fn format_count(count: u64) -> String {
    let mut buf = itoa::Buffer::new();
    buf.format(count).to_string()
}

fn format_timestamp_seconds(millis: i64) -> String {
    format!("{}.{:03}", millis.div_euclid(1000), millis.rem_euclid(1000))
}

fn write_label_set<W: fmt::Write>(
    out: &mut W,
    labels: &Labels,
    extra: Option<(&str, &str)>,
) -> fmt::Result {
    if labels.is_empty() && extra.is_none() {
        return Ok(());
    }
    write!(out, "{{")?;
    let mut first = true;
    for (name, value) in labels.iter() {
        if !first {
            write!(out, ",")?;
        }
        write!(out, "{name}=\"{}\"", escape_label_value(value))?;
        first = false;
    }
    if let Some((name, value)) = extra {
        if !first {
            write!(out, ",")?;
        }
        write!(out, "{name}=\"{value}\"")?;
    }
    write!(out, "}}")
}

fn write_exemplar<W: fmt::Write>(out: &mut W, exemplar: &Exemplar) -> fmt::Result {
    write!(out, "{{")?;
    let mut first = true;
    for (name, value) in exemplar.labels().iter() {
        if !first {
            write!(out, ",")?;
        }
        write!(out, "{name}=\"{}\"", escape_label_value(value))?;
        first = false;
    }
    if let Some(trace_id) = exemplar.trace_id() {
        if !first {
            write!(out, ",")?;
        }
        write!(out, "trace_id=\"{}\"", escape_label_value(trace_id))?;
        first = false;
    }
    if let Some(span_id) = exemplar.span_id() {
        if !first {
            write!(out, ",")?;
        }
        write!(out, "span_id=\"{}\"", escape_label_value(span_id))?;
    }
    write!(out, "}}")?;
    write!(out, " {}", format_value(exemplar.value()))?;
    if let Some(ts) = exemplar.timestamp_millis() {
        write!(out, " {}", format_timestamp_seconds(ts))?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn write_sample<W: fmt::Write>(
    out: &mut W,
    name: &str,
    labels: &Labels,
    extra: Option<(&str, &str)>,
    value: &str,
    scrape_timestamp_millis: Option<i64>,
    exemplar: Option<&Exemplar>,
) -> fmt::Result {
    write!(out, "{name}")?;
    write_label_set(out, labels, extra)?;
    write!(out, " {value}")?;
    if let Some(ts) = scrape_timestamp_millis {
        write!(out, " {}", format_timestamp_seconds(ts))?;
    }
    if let Some(exemplar) = exemplar {
        write!(out, " # ")?;
        write_exemplar(out, exemplar)?;
    }
    writeln!(out)
}

fn write_header<W: fmt::Write>(
    out: &mut W,
    name: &str,
    help: &str,
    unit: Option<&str>,
    keyword: &str,
    cfg: &ProfileConfig,
) -> fmt::Result {
    let help_line = (!help.is_empty())
        .then(|| format!("# HELP {name} {}\n", escape_help(help, cfg.escape_help_quote)));

    if cfg.help_before_type {
        if let Some(help_line) = &help_line {
            write!(out, "{help_line}")?;
        }
        writeln!(out, "# TYPE {name} {keyword}")?;
    } else {
        writeln!(out, "# TYPE {name} {keyword}")?;
        if cfg.emit_unit {
            if let Some(unit) = unit {
                writeln!(out, "# UNIT {name} {unit}")?;
            }
        }
        if let Some(help_line) = &help_line {
            write!(out, "{help_line}")?;
        }
    }
    Ok(())
}

fn write_buckets<W: fmt::Write>(
    out: &mut W,
    name: &str,
    labels: &Labels,
    buckets: &[BucketValue],
    scrape_timestamp_millis: Option<i64>,
    emit_exemplars: bool,
) -> fmt::Result {
    for bucket in buckets {
        write_sample(
            out,
            name,
            labels,
            Some(("le", &format_value(bucket.upper_bound))),
            &format_count(bucket.count),
            scrape_timestamp_millis,
            emit_exemplars.then_some(bucket.exemplar.as_ref()).flatten(),
        )?;
    }
    Ok(())
}

/// Renders one metric family's header and every non-empty data record, per `profile`.
///
/// Writes nothing if every data record is empty (e.g. a summary with no observations reported by
/// its estimator) — the `# TYPE` header is suppressed along with it.
pub(super) fn write_metric<W: fmt::Write>(
    out: &mut W,
    snapshot: &MetricSnapshot,
    profile: TextProfile,
) -> Result<()> {
    if snapshot.records.iter().all(|record| record.data.is_empty()) {
        return Ok(());
    }

    let cfg = ProfileConfig::from(profile);
    let metadata = &snapshot.metadata;
    let name = metadata.name();
    let ty = metadata.metric_type();
    let keyword = type_keyword(ty, profile);
    let header = header_name(name, ty, profile);

    write_header(out, &header, metadata.help(), metadata.unit().map(|u| u.as_str()), keyword, &cfg)?;

    for record in &snapshot.records {
        if record.data.is_empty() {
            continue;
        }
        let labels = metadata.const_labels().merge(&record.labels)?;
        write_record(out, name, &labels, record, &cfg, profile)?;
    }

    if cfg.split_created_as_gauge {
        write_created_companion(out, name, metadata, &snapshot.records)?;
    }
    if profile == TextProfile::Prometheus004 && ty == MetricType::GaugeHistogram {
        write_gauge_histogram_companions(out, name, metadata, &snapshot.records)?;
    }

    Ok(())
}

fn write_record<W: fmt::Write>(
    out: &mut W,
    name: &str,
    labels: &Labels,
    record: &DataRecord,
    cfg: &ProfileConfig,
    profile: TextProfile,
) -> fmt::Result {
    let ts = record.scrape_timestamp_millis;
    match &record.data {
        MetricData::Counter { value, exemplar, created_millis } => {
            write_sample(
                out,
                &format!("{name}_total"),
                labels,
                None,
                &format_value(*value),
                ts,
                cfg.emit_exemplars.then_some(exemplar.as_ref()).flatten(),
            )?;
            if !cfg.split_created_as_gauge {
                if let Some(created) = created_millis {
                    write_sample(
                        out,
                        &format!("{name}_created"),
                        labels,
                        None,
                        &format_timestamp_seconds(*created),
                        ts,
                        None,
                    )?;
                }
            }
        },
        MetricData::Gauge { value, exemplar } => {
            write_sample(
                out,
                name,
                labels,
                None,
                &format_value(*value),
                ts,
                cfg.emit_exemplars.then_some(exemplar.as_ref()).flatten(),
            )?;
        },
        MetricData::Unknown { value, exemplar } => {
            write_sample(
                out,
                name,
                labels,
                None,
                &format_value(*value),
                ts,
                cfg.emit_exemplars.then_some(exemplar.as_ref()).flatten(),
            )?;
        },
        MetricData::Histogram { buckets, sum, count, created_millis } => {
            write_buckets(out, &format!("{name}_bucket"), labels, buckets, ts, cfg.emit_exemplars)?;

            let effective_count = if cfg.synthesize_histogram_count {
                count.or_else(|| buckets.last().map(|b| b.count))
            } else {
                count.filter(|_| sum.is_some())
            };
            if let Some(count) = effective_count {
                write_sample(out, &format!("{name}_count"), labels, None, &format_count(count), ts, None)?;
            }
            if let Some(sum) = sum {
                write_sample(out, &format!("{name}_sum"), labels, None, &format_sum(*sum), ts, None)?;
            }
            if !cfg.split_created_as_gauge {
                if let Some(created) = created_millis {
                    write_sample(
                        out,
                        &format!("{name}_created"),
                        labels,
                        None,
                        &format_timestamp_seconds(*created),
                        ts,
                        None,
                    )?;
                }
            }
        },
        MetricData::GaugeHistogram { buckets, gsum, gcount, created_millis } => {
            write_buckets(out, &format!("{name}_bucket"), labels, buckets, ts, cfg.emit_exemplars)?;

            if profile != TextProfile::Prometheus004 {
                if let Some(gcount) = gcount.filter(|_| gsum.is_some()) {
                    write_sample(out, &format!("{name}_gcount"), labels, None, &format_count(gcount), ts, None)?;
                }
                if let Some(gsum) = gsum {
                    write_sample(out, &format!("{name}_gsum"), labels, None, &format_sum(*gsum), ts, None)?;
                }
                if let Some(created) = created_millis {
                    write_sample(
                        out,
                        &format!("{name}_created"),
                        labels,
                        None,
                        &format_timestamp_seconds(*created),
                        ts,
                        None,
                    )?;
                }
            }
        },
        MetricData::Summary { quantiles, sum, count, created_millis, exemplar } => {
            for quantile in quantiles {
                write_sample(
                    out,
                    name,
                    labels,
                    Some(("quantile", &format_value(quantile.quantile()))),
                    &format_value(quantile.value()),
                    ts,
                    None,
                )?;
            }
            if let Some(count) = count {
                write_sample(out, &format!("{name}_count"), labels, None, &format_count(*count), ts, None)?;
            }
            if let Some(sum) = sum {
                write_sample(
                    out,
                    &format!("{name}_sum"),
                    labels,
                    None,
                    &format_sum(*sum),
                    ts,
                    cfg.emit_exemplars.then_some(exemplar.as_ref()).flatten(),
                )?;
            }
            if !cfg.split_created_as_gauge {
                if let Some(created) = created_millis {
                    write_sample(
                        out,
                        &format!("{name}_created"),
                        labels,
                        None,
                        &format_timestamp_seconds(*created),
                        ts,
                        None,
                    )?;
                }
            }
        },
        MetricData::Info => {
            write_sample(out, &format!("{name}_info"), labels, None, "1", ts, None)?;
        },
        MetricData::StateSet { states } => {
            for (state, enabled) in states {
                write_sample(
                    out,
                    name,
                    labels,
                    Some(("state", state.as_str())),
                    if *enabled { "1" } else { "0" },
                    ts,
                    None,
                )?;
            }
        },
    }
    Ok(())
}

fn write_created_companion<W: fmt::Write>(
    out: &mut W,
    name: &str,
    metadata: &Metadata,
    records: &[DataRecord],
) -> Result<()> {
    let lines: Vec<(Labels, i64, Option<i64>)> = records
        .iter()
        .filter_map(|record| {
            let created = match &record.data {
                MetricData::Counter { created_millis, .. }
                | MetricData::Histogram { created_millis, .. }
                | MetricData::GaugeHistogram { created_millis, .. }
                | MetricData::Summary { created_millis, .. } => *created_millis,
                _ => None,
            }?;
            let labels = metadata.const_labels().merge(&record.labels).ok()?;
            Some((labels, created, record.scrape_timestamp_millis))
        })
        .collect();
    if lines.is_empty() {
        return Ok(());
    }

    let created_name = format!("{name}_created");
    writeln!(out, "# TYPE {created_name} gauge")?;
    for (labels, created, ts) in lines {
        write_sample(out, &created_name, &labels, None, &format_timestamp_seconds(created), ts, None)?;
    }
    Ok(())
}

fn write_gauge_histogram_companions<W: fmt::Write>(
    out: &mut W,
    name: &str,
    metadata: &Metadata,
    records: &[DataRecord],
) -> Result<()> {
    let gcount_name = format!("{name}_gcount");
    writeln!(out, "# TYPE {gcount_name} gauge")?;
    for record in records {
        if let MetricData::GaugeHistogram { gcount: Some(gcount), .. } = &record.data {
            let labels = metadata.const_labels().merge(&record.labels)?;
            write_sample(
                out,
                &gcount_name,
                &labels,
                None,
                &format_count(*gcount),
                record.scrape_timestamp_millis,
                None,
            )?;
        }
    }

    let has_gsum = records
        .iter()
        .any(|record| matches!(&record.data, MetricData::GaugeHistogram { gsum: Some(_), .. }));
    if has_gsum {
        let gsum_name = format!("{name}_gsum");
        writeln!(out, "# TYPE {gsum_name} gauge")?;
        for record in records {
            if let MetricData::GaugeHistogram { gsum: Some(gsum), .. } = &record.data {
                let labels = metadata.const_labels().merge(&record.labels)?;
                write_sample(
                    out,
                    &gsum_name,
                    &labels,
                    None,
                    &format_sum(*gsum),
                    record.scrape_timestamp_millis,
                    None,
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value_drops_trailing_zero() {
        assert_eq!(format_value(2.0), "2");
        assert_eq!(format_value(1.1), "1.1");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_value(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_sum_retains_trailing_zero() {
        assert_eq!(format_sum(2.0), "2.0");
        assert_eq!(format_sum(1.1), "1.1");
    }

    #[test]
    fn test_format_timestamp_seconds() {
        assert_eq!(format_timestamp_seconds(1672850685829), "1672850685.829");
    }
}
