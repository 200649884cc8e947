use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use vis_charts::api::{DEFAULT_BAR_PADDING, GeometrySnapshot, PointerHandler};
use vis_charts::core::{Key, MAX_TICK_COUNT, ScaleType, TickFormat};
use vis_charts::interaction::{PointerEvent, PointerEventKind};
use vis_charts::transition::StagedTransitions;
use vis_charts::{
    BarChart, BarChartConfig, BarChartOptions, BarDatum, ChartError, Fill, Visualise,
};

fn data(rows: &[(&str, f64)]) -> Vec<BarDatum> {
    rows.iter()
        .map(|(key, value)| BarDatum::new(*key, *value))
        .collect()
}

fn settled_chart(rows: &[(&str, f64)]) -> BarChart<BarDatum> {
    let mut chart = BarChart::new(BarChartOptions::default().with_data(data(rows)))
        .expect("bar chart init");
    chart.finish_transitions();
    chart
}

fn bar_rect(chart: &BarChart<BarDatum>, key: &str) -> (f64, f64, f64, f64) {
    let snapshot = chart.snapshot();
    let shape = snapshot.shape(&Key::from(key)).expect("bar present");
    match shape.geometry {
        GeometrySnapshot::Bar {
            x,
            y,
            width,
            height,
        } => (x, y, width, height),
        GeometrySnapshot::Bubble { .. } => panic!("bar chart produced a bubble"),
    }
}

#[test]
fn mixed_sign_values_share_a_zero_baseline() {
    let chart = settled_chart(&[("a", 5.0), ("b", -3.0)]);
    let y = chart.y_scale().expect("y scale");
    assert_eq!(y.domain(), (-3.0, 5.0));
    let baseline = y.scale(0.0);

    let (_, a_y, _, a_h) = bar_rect(&chart, "a");
    assert_relative_eq!(a_y, y.scale(5.0));
    assert_relative_eq!(a_y + a_h, baseline);

    let (_, b_y, _, b_h) = bar_rect(&chart, "b");
    assert_relative_eq!(b_y, baseline);
    assert_relative_eq!(b_y + b_h, y.scale(-3.0));

    let snapshot = chart.snapshot();
    assert!(!snapshot.x_axis.ticks[0].is_lifted());
    assert!(snapshot.x_axis.ticks[1].is_lifted());
}

#[test]
fn positive_values_start_the_domain_at_zero() {
    let chart = settled_chart(&[("a", 2.0), ("b", 7.5)]);
    assert_eq!(chart.y_scale().expect("y").domain(), (0.0, 7.5));

    let chart = settled_chart(&[("a", -2.0), ("b", -7.5)]);
    assert_eq!(chart.y_scale().expect("y").domain(), (-7.5, 0.0));
}

#[test]
fn one_bar_per_distinct_key() {
    let chart = settled_chart(&[("a", 1.0), ("b", 2.0), ("a", 3.0), ("c", 4.0)]);
    let snapshot = chart.snapshot();
    assert_eq!(snapshot.shapes.len(), 3);
    assert_eq!(
        snapshot.categories,
        vec![Key::from("a"), Key::from("b"), Key::from("c")]
    );
    let (_, a_y, _, _) = bar_rect(&chart, "a");
    assert_relative_eq!(a_y, chart.y_scale().expect("y").scale(1.0));
}

#[test]
fn removed_key_exits_after_the_remove_stage() {
    let mut chart = settled_chart(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
    chart.render(data(&[("a", 1.0), ("c", 3.0)])).expect("render");

    let snapshot = chart.snapshot();
    let b = snapshot.shape(&Key::from("b")).expect("b still exiting");
    assert!(b.exiting);
    assert!(!b.classes.iter().any(|class| class == "selected"));

    chart.tick(299.0);
    assert!(chart.snapshot().shape(&Key::from("b")).is_some());
    chart.tick(1.0);
    assert!(chart.snapshot().shape(&Key::from("b")).is_none());
    assert_eq!(chart.snapshot().shapes.len(), 2);

    chart.tick(600.0);
    assert!(!chart.is_animating());
}

#[test]
fn rerendering_the_same_data_is_idempotent() {
    let rows = [("a", 4.0), ("b", -1.0), ("c", 2.5)];
    let mut chart = settled_chart(&rows);
    let first = chart.snapshot().shapes;

    chart.render(data(&rows)).expect("render");
    chart.finish_transitions();
    assert_eq!(chart.snapshot().shapes, first);

    chart.refresh().expect("refresh");
    chart.finish_transitions();
    assert_eq!(chart.snapshot().shapes, first);
}

#[test]
fn empty_render_exits_every_bar() {
    let mut chart = settled_chart(&[("a", 1.0), ("b", 2.0)]);
    chart.render(Vec::new()).expect("render empty");
    assert_eq!(chart.y_scale().expect("y").domain(), (0.0, 1.0));
    assert!(chart.snapshot().shapes.iter().all(|shape| shape.exiting));
    chart.finish_transitions();
    assert!(chart.snapshot().shapes.is_empty());
}

#[test]
fn explicit_domain_is_used_verbatim() {
    let mut chart = settled_chart(&[("a", 3.0)]);
    chart.set_y_domain(Some((-10.0, 10.0))).expect("domain");
    assert_eq!(chart.y_scale().expect("y").domain(), (-10.0, 10.0));

    chart.set_y_domain(None).expect("auto domain");
    assert_eq!(chart.y_scale().expect("y").domain(), (0.0, 3.0));
}

#[test]
fn rejected_setter_leaves_chart_unchanged() {
    let mut chart = settled_chart(&[("a", 3.0), ("b", 0.0)]);
    chart.set_y_domain(Some((-1.0, 5.0))).expect("domain");
    let before = chart.snapshot();

    let err = chart
        .set_y_type(ScaleType::Log { base: 10.0 })
        .err()
        .expect("log domain crossing zero");
    assert!(matches!(err, ChartError::InvalidDomain(_)));
    assert_eq!(chart.config().y_type, ScaleType::Linear);

    let err = chart.set_padding(1.5).err().expect("padding out of range");
    assert!(matches!(err, ChartError::InvalidRange(_)));
    assert_eq!(chart.config().padding, DEFAULT_BAR_PADDING);
    assert_eq!(chart.snapshot(), before);
}

#[test]
fn tooltips_follow_the_text_accessor() {
    let options = BarChartOptions::default()
        .with_tooltips(|d: &BarDatum| format!("{}: {}", d.key, d.value))
        .with_data(data(&[("a", 5.0), ("b", 2.0)]));
    let mut chart = BarChart::new(options).expect("chart");

    let snapshot = chart.snapshot();
    let a = snapshot.shape(&Key::from("a")).expect("a");
    assert_eq!(a.tooltip.as_deref(), Some("a: 5"));
    let svg = chart.to_svg().expect("svg");
    assert!(svg.contains("data-tippy-content=\"b: 2\""));
    assert!(svg.contains("<title>a: 5</title>"));

    chart.set_tooltips(None);
    assert!(chart.snapshot().shapes.iter().all(|shape| shape.tooltip.is_none()));
    assert!(!chart.to_svg().expect("svg").contains("data-tippy-content"));
}

#[test]
fn click_and_hover_receive_the_bound_record() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let record = |kind: &'static str| -> PointerHandler<BarDatum> {
        let sink = Arc::clone(&events);
        Arc::new(move |_: &PointerEvent, d: &BarDatum| {
            sink.lock().expect("lock").push(format!("{kind}:{}", d.key));
        })
    };
    let options = BarChartOptions::default()
        .with_over(record("over"))
        .with_out(record("out"))
        .with_click(record("click"))
        .with_data(data(&[("a", 5.0), ("b", 2.0)]));
    let mut chart = BarChart::new(options).expect("chart");
    chart.finish_transitions();

    let grid = *chart.grid();
    let (x, y, w, h) = bar_rect(&chart, "a");
    let (cx, cy) = (grid.left() + x + w / 2.0, grid.top() + y + h / 2.0);

    let change = chart.pointer_move(cx, cy);
    assert_eq!(change.entered, Some(Key::from("a")));
    assert!(chart.pointer_move(cx + 1.0, cy).is_empty());
    assert_eq!(chart.click(cx, cy), Some(Key::from("a")));
    assert_eq!(
        chart.dispatch(PointerEvent::new(PointerEventKind::Out, 0.0, 0.0)),
        Some(Key::from("a"))
    );
    assert_eq!(chart.click(1.0, 1.0), None);

    assert_eq!(
        *events.lock().expect("lock"),
        vec!["over:a", "click:a", "out:a"]
    );
}

#[test]
fn selection_marks_exactly_the_given_keys() {
    let mut chart = settled_chart(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
    chart.select_bars(["a", "c"], None);
    chart.select_bars(["b"], None);
    chart.highlight_bars(["c"]);

    let snapshot = chart.snapshot();
    let classes = |key: &str| snapshot.shape(&Key::from(key)).expect("shape").classes.clone();
    assert_eq!(classes("a"), Vec::<String>::new());
    assert_eq!(classes("b"), vec!["selected".to_owned()]);
    assert_eq!(classes("c"), vec!["highlighted".to_owned()]);

    chart.highlight_bars(Vec::<&str>::new());
    let snapshot = chart.snapshot();
    let c = snapshot.shape(&Key::from("c")).expect("c");
    assert!(!c.classes.iter().any(|class| class == "highlighted"));
}

#[test]
fn resize_rescales_bars_and_axes() {
    let mut chart = settled_chart(&[("a", 1.0), ("b", 2.0)]);
    chart.set_width(400.0).expect("width");
    chart.set_margin([20.0, 20.0, 40.0, 10.0]).expect("margin");
    chart.finish_transitions();

    assert_eq!(chart.x_scale().expect("x").range(), (0.0, 350.0));
    assert_eq!(chart.y_scale().expect("y").range(), (760.0, 0.0));
    assert_eq!(chart.snapshot().x_axis.range, (0.0, 350.0));
    let (_, b_y, _, b_h) = bar_rect(&chart, "b");
    assert_relative_eq!(b_y, 0.0);
    assert_relative_eq!(b_h, 760.0);

    let err = chart.set_width(-1.0).err().expect("negative width");
    assert!(matches!(err, ChartError::InvalidSize { .. }));
    assert_eq!(chart.grid().width(), 400.0);
}

#[test]
fn constant_and_computed_colors() {
    let mut chart = settled_chart(&[("a", 1.0), ("b", -2.0)]);
    chart.set_color("#ff0000").expect("constant");
    chart.finish_transitions();
    assert_eq!(
        chart.snapshot().shape(&Key::from("b")).expect("b").fill.as_deref(),
        Some("#ff0000")
    );

    chart
        .set_color(Fill::from_fn(|d: &BarDatum| {
            Some(if d.value < 0.0 { "#0000ff" } else { "#00ff00" }.to_owned())
        }))
        .expect("computed");
    chart.finish_transitions();
    let snapshot = chart.snapshot();
    assert_eq!(snapshot.shape(&Key::from("a")).expect("a").fill.as_deref(), Some("#00ff00"));
    assert_eq!(snapshot.shape(&Key::from("b")).expect("b").fill.as_deref(), Some("#0000ff"));
}

#[test]
fn config_loaded_from_json_drives_the_chart() {
    let config = BarChartConfig::from_json_str(
        r#"{
            "width": 300,
            "height": 200,
            "margin": [10, 30, 40, 10],
            "title": "Sales",
            "y_label": "units",
            "y_format": ",.1f",
            "padding": 0.2
        }"#,
    )
    .expect("config");
    let options = BarChartOptions::default()
        .with_config(config)
        .with_transitions(StagedTransitions::immediate())
        .with_data(data(&[("q1", 1200.0), ("q2", 800.0)]));
    let chart = BarChart::new(options).expect("chart");

    assert_eq!(chart.x_scale().expect("x").padding(), 0.2);
    let labels: Vec<String> = chart
        .snapshot()
        .y_axis
        .ticks
        .iter()
        .map(|tick| tick.label.clone())
        .collect();
    assert!(labels.contains(&"1,200.0".to_owned()));

    let round_trip = BarChartConfig::from_json_str(&chart.config().to_json_pretty().expect("json"))
        .expect("reparse");
    assert_eq!(round_trip, chart.config());
    assert_eq!(round_trip.vis.title.as_deref(), Some("Sales"));
}

#[test]
fn invalid_format_is_rejected_at_construction() {
    let mut options = BarChartOptions::default();
    options.config.y_format = Some(".q".to_owned());
    let err = BarChart::new(options).err().expect("bad specifier");
    assert!(matches!(err, ChartError::InvalidFormat(_)));
}

#[test]
fn non_ascii_fill_switches_without_interpolating() {
    let mut chart = settled_chart(&[("a", 1.0), ("b", 2.0)]);
    chart.set_color("#aébcd").expect("any fill string is accepted");
    for _ in 0..9 {
        chart.tick(100.0);
    }
    assert!(!chart.is_animating());
    assert_eq!(
        chart.snapshot().shape(&Key::from("a")).expect("a").fill.as_deref(),
        Some("#aébcd")
    );
}

#[test]
fn huge_tick_count_is_clamped() {
    let mut chart = settled_chart(&[("a", 3.0), ("b", -1.0)]);
    chart.set_y_ticks(Some(usize::MAX)).expect("any count is accepted");
    assert_eq!(chart.config().y_ticks, Some(usize::MAX));

    let ticks = chart.snapshot().y_axis.ticks.len();
    assert!(ticks > 10 && ticks <= 2 * MAX_TICK_COUNT + 1);
}

#[test]
fn failed_format_change_keeps_the_previous_specifier() {
    let poisoned = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&poisoned);
    let mut options = BarChartOptions::new(move |d: &BarDatum| {
        if flag.load(Ordering::SeqCst) { f64::NAN } else { d.value }
    })
    .with_keys(|d: &BarDatum| Key::from(&d.key))
    .with_data(data(&[("a", 1.0), ("b", 2.0)]));
    options.config.y_format = Some(",.1f".to_owned());
    let mut chart = BarChart::new(options).expect("chart");
    chart.finish_transitions();
    let before = chart.snapshot();

    poisoned.store(true, Ordering::SeqCst);
    let err = chart.set_y_format(Some(".3f")).err().expect("non-finite value");
    assert!(matches!(err, ChartError::InvalidData(_)));
    let err = chart
        .set_y_formatter(TickFormat::custom(|value| format!("{value}!")))
        .err()
        .expect("non-finite value");
    assert!(matches!(err, ChartError::InvalidData(_)));
    assert_eq!(chart.config().y_format.as_deref(), Some(",.1f"));
    assert_eq!(chart.snapshot(), before);

    poisoned.store(false, Ordering::SeqCst);
    chart.set_y_format(Some(".3f")).expect("valid again");
    assert_eq!(chart.config().y_format.as_deref(), Some(".3f"));
}
