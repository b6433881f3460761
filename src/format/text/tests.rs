use indoc::indoc;

use crate::{
    format::{profile::TextProfile, text::encode},
    raw::{
        exemplar::Exemplar,
        labels::Labels,
        metadata::{Metadata, Unit},
        quantile::Quantile,
        MetricType,
    },
    snapshot::{BucketValue, DataRecord, MetricData, MetricSnapshot, MetricSnapshots},
};

fn encode_one(metadata: Metadata, records: Vec<DataRecord>, profile: TextProfile) -> String {
    let snapshots = MetricSnapshots::of([MetricSnapshot::new(metadata, records)]).unwrap();
    let mut out = String::new();
    encode(&mut out, &snapshots, profile).unwrap();
    out
}

#[test]
fn test_minimal_counter_openmetrics() {
    let metadata = Metadata::new("my_counter", "", MetricType::Counter, None, Labels::empty());
    let record = DataRecord::new(
        Labels::empty(),
        MetricData::Counter { value: 1.1, created_millis: None, exemplar: None },
    );
    let output = encode_one(metadata, vec![record], TextProfile::OpenMetrics1);
    assert_eq!(
        output,
        indoc! {"
            # TYPE my_counter counter
            my_counter_total 1.1
            # EOF
        "}
    );
}

#[test]
fn test_minimal_counter_prometheus() {
    let metadata = Metadata::new("my_counter", "", MetricType::Counter, None, Labels::empty());
    let record = DataRecord::new(
        Labels::empty(),
        MetricData::Counter { value: 1.1, created_millis: None, exemplar: None },
    );
    let output = encode_one(metadata, vec![record], TextProfile::Prometheus004);
    assert_eq!(
        output,
        indoc! {"
            # TYPE my_counter_total counter
            my_counter_total 1.1
        "}
    );
}

#[test]
fn test_histogram_only_inf_bucket_no_sum() {
    let metadata = Metadata::new("h", "", MetricType::Histogram, None, Labels::empty());
    let data = MetricData::Histogram {
        buckets: vec![BucketValue { upper_bound: f64::INFINITY, count: 2, exemplar: None }],
        sum: None,
        count: None,
        created_millis: None,
    };
    let record = DataRecord::new(Labels::empty(), data);

    let om = encode_one(metadata.clone(), vec![record.clone()], TextProfile::OpenMetrics1);
    assert_eq!(
        om,
        indoc! {r#"
            # TYPE h histogram
            h_bucket{le="+Inf"} 2
            # EOF
        "#}
    );

    // Prometheus synthesizes `_count` from the +Inf bucket when none was set explicitly.
    let prom = encode_one(metadata, vec![record], TextProfile::Prometheus004);
    assert_eq!(
        prom,
        indoc! {r#"
            # TYPE h histogram
            h_bucket{le="+Inf"} 2
            h_count 2
        "#}
    );
}

#[test]
fn test_summary_empty_record_among_non_empty() {
    let metadata = Metadata::new("s", "", MetricType::Summary, None, Labels::empty());
    let empty = DataRecord::new(
        Labels::from_pairs([("kind", "empty")]).unwrap(),
        MetricData::Summary {
            quantiles: Vec::new(),
            sum: None,
            count: None,
            created_millis: None,
            exemplar: None,
        },
    );
    let filled = DataRecord::new(
        Labels::from_pairs([("kind", "filled")]).unwrap(),
        MetricData::Summary {
            quantiles: vec![Quantile::new(0.5, 10.0)],
            sum: Some(10.0),
            count: Some(1),
            created_millis: None,
            exemplar: None,
        },
    );

    let output = encode_one(metadata, vec![empty, filled], TextProfile::OpenMetrics1);
    assert_eq!(
        output,
        indoc! {r#"
            # TYPE s summary
            s{kind="filled",quantile="0.5"} 10
            s_count{kind="filled"} 1
            s_sum{kind="filled"} 10.0
            # EOF
        "#}
    );
}

#[test]
fn test_summary_all_empty_suppresses_type_header() {
    let metadata = Metadata::new("s", "", MetricType::Summary, None, Labels::empty());
    let empty = DataRecord::new(
        Labels::empty(),
        MetricData::Summary {
            quantiles: Vec::new(),
            sum: None,
            count: None,
            created_millis: None,
            exemplar: None,
        },
    );
    let output = encode_one(metadata, vec![empty], TextProfile::OpenMetrics1);
    assert_eq!(output, "# EOF\n");
}

#[test]
fn test_info_metric() {
    let metadata = Metadata::new("build", "", MetricType::Info, None, Labels::empty());
    let record = DataRecord::new(Labels::from_pairs([("version", "1.0.0")]).unwrap(), MetricData::Info);

    let om = encode_one(metadata.clone(), vec![record.clone()], TextProfile::OpenMetrics1);
    assert_eq!(
        om,
        indoc! {r#"
            # TYPE build_info info
            build_info{version="1.0.0"} 1
            # EOF
        "#}
    );

    let prom = encode_one(metadata, vec![record], TextProfile::Prometheus004);
    assert_eq!(
        prom,
        indoc! {r#"
            # TYPE build_info gauge
            build_info{version="1.0.0"} 1
        "#}
    );
}

#[test]
fn test_help_escaping_differs_by_profile() {
    let help = "Some text and \n some \" escaping";
    let metadata = Metadata::new("test", help, MetricType::Counter, None, Labels::empty());
    let record = DataRecord::new(
        Labels::empty(),
        MetricData::Counter { value: 1.0, created_millis: None, exemplar: None },
    );

    let om = encode_one(metadata.clone(), vec![record.clone()], TextProfile::OpenMetrics1);
    assert!(om.contains("# HELP test Some text and \\n some \\\" escaping\n"));

    let prom = encode_one(metadata, vec![record], TextProfile::Prometheus004);
    assert!(prom.contains("# HELP test_total Some text and \\n some \" escaping\n"));
}

#[test]
fn test_counter_with_unit_two_label_combinations_and_exemplars() {
    let metadata = Metadata::new(
        "service_time_seconds",
        "total time spent serving",
        MetricType::Counter,
        Some(Unit::Seconds),
        Labels::empty(),
    );

    let exemplar_a = Exemplar::new(
        1.7,
        Labels::from_pairs([("env", "prod")]).unwrap(),
        Some(1672850685829),
        Some("abcde".to_string()),
        Some("12345".to_string()),
    )
    .unwrap();
    let record_a = DataRecord::new(
        Labels::from_pairs([("path", "/hello"), ("status", "200")]).unwrap(),
        MetricData::Counter {
            value: 0.8,
            created_millis: Some(1672850385800),
            exemplar: Some(exemplar_a),
        },
    )
    .with_scrape_timestamp(1672850685829);

    let exemplar_b =
        Exemplar::new(0.9, Labels::from_pairs([("env", "dev")]).unwrap(), None, None, None).unwrap();
    let record_b = DataRecord::new(
        Labels::from_pairs([("path", "/hello"), ("status", "500")]).unwrap(),
        MetricData::Counter {
            value: 0.9,
            created_millis: Some(1672850285000),
            exemplar: Some(exemplar_b),
        },
    )
    .with_scrape_timestamp(1672850585820);

    let om =
        encode_one(metadata.clone(), vec![record_a.clone(), record_b.clone()], TextProfile::OpenMetrics1);
    let mut lines = om.lines();
    assert_eq!(lines.next().unwrap(), "# TYPE service_time_seconds counter");
    assert_eq!(lines.next().unwrap(), "# UNIT service_time_seconds seconds");
    assert_eq!(lines.next().unwrap(), "# HELP service_time_seconds total time spent serving");
    assert!(lines
        .next()
        .unwrap()
        .starts_with("service_time_seconds_total{path=\"/hello\",status=\"200\"} 0.8 1672850685.829 # "));
    assert_eq!(
        lines.next().unwrap(),
        "service_time_seconds_created{path=\"/hello\",status=\"200\"} 1672850385.800 1672850685.829"
    );
    assert!(lines
        .next()
        .unwrap()
        .starts_with("service_time_seconds_total{path=\"/hello\",status=\"500\"} 0.9 1672850585.820 # "));
    assert_eq!(
        lines.next().unwrap(),
        "service_time_seconds_created{path=\"/hello\",status=\"500\"} 1672850285.000 1672850585.820"
    );
    assert_eq!(lines.next().unwrap(), "# EOF");
    assert!(lines.next().is_none());

    // Prometheus splits `_created` into its own HELP/TYPE block, after both `_total` lines.
    let prom = encode_one(metadata, vec![record_a, record_b], TextProfile::Prometheus004);
    let mut lines = prom.lines();
    assert_eq!(lines.next().unwrap(), "# HELP service_time_seconds_total total time spent serving");
    assert_eq!(lines.next().unwrap(), "# TYPE service_time_seconds_total counter");
    assert_eq!(
        lines.next().unwrap(),
        "service_time_seconds_total{path=\"/hello\",status=\"200\"} 0.8 1672850685.829"
    );
    assert_eq!(
        lines.next().unwrap(),
        "service_time_seconds_total{path=\"/hello\",status=\"500\"} 0.9 1672850585.820"
    );
    assert_eq!(lines.next().unwrap(), "# TYPE service_time_seconds_created gauge");
    assert_eq!(
        lines.next().unwrap(),
        "service_time_seconds_created{path=\"/hello\",status=\"200\"} 1672850385.800 1672850685.829"
    );
    assert_eq!(
        lines.next().unwrap(),
        "service_time_seconds_created{path=\"/hello\",status=\"500\"} 1672850285.000 1672850585.820"
    );
    assert!(lines.next().is_none());
}

#[test]
fn test_gauge_histogram_prometheus_splits_gcount_and_gsum() {
    let metadata = Metadata::new("gh", "", MetricType::GaugeHistogram, None, Labels::empty());
    let data = MetricData::GaugeHistogram {
        buckets: vec![BucketValue { upper_bound: f64::INFINITY, count: 3, exemplar: None }],
        gsum: Some(9.0),
        gcount: Some(3),
        created_millis: None,
    };
    let record = DataRecord::new(Labels::empty(), data);

    let prom = encode_one(metadata, vec![record], TextProfile::Prometheus004);
    assert_eq!(
        prom,
        indoc! {r#"
            # TYPE gh histogram
            gh_bucket{le="+Inf"} 3
            # TYPE gh_gcount gauge
            gh_gcount 3
            # TYPE gh_gsum gauge
            gh_gsum 9.0
        "#}
    );
}
