use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use vis_charts::api::{GeometrySnapshot, PointerHandler};
use vis_charts::core::{Key, ScaleType, TickFormat};
use vis_charts::interaction::PointerEvent;
use vis_charts::{
    BubbleChart, BubbleChartConfig, BubbleChartOptions, BubbleDatum, ChartError, Visualise,
};

fn settled_chart(data: Vec<BubbleDatum>) -> BubbleChart<BubbleDatum> {
    let mut chart =
        BubbleChart::new(BubbleChartOptions::default().with_data(data)).expect("bubble chart init");
    chart.finish_transitions();
    chart
}

fn circles(chart: &BubbleChart<BubbleDatum>) -> Vec<(Key, f64, f64, f64)> {
    chart
        .snapshot()
        .shapes
        .into_iter()
        .filter(|shape| !shape.exiting)
        .map(|shape| match shape.geometry {
            GeometrySnapshot::Bubble { cx, cy, r } => (shape.key, cx, cy, r),
            GeometrySnapshot::Bar { .. } => panic!("bubble chart produced a bar"),
        })
        .collect()
}

#[test]
fn single_bubble_domains_are_padded_by_its_radius() {
    let chart = settled_chart(vec![BubbleDatum::new(1.0, 1.0, 10.0)]);
    let grid = *chart.grid();

    let (x0, x1) = chart.x_scale().expect("x").domain();
    let (y0, y1) = chart.y_scale().expect("y").domain();
    assert!(x0 < 0.0 && x1 > 1.0);
    assert!(y0 < 0.0 && y1 > 1.0);
    assert_eq!(chart.r_scale().expect("r").domain(), (0.0, 10.0));

    let bubbles = circles(&chart);
    let (_, cx, cy, r) = &bubbles[0];
    assert_relative_eq!(*r, 25.0);
    assert_relative_eq!(*cx + *r, grid.inner_width(), epsilon = 1e-9);
    assert_relative_eq!(*cy - *r, 0.0, epsilon = 1e-9);

    let x = chart.x_scale().expect("x");
    assert_relative_eq!(x.scale(0.0), 25.0, epsilon = 1e-9);
}

#[test]
fn explicit_domains_are_still_padded() {
    let mut options = BubbleChartOptions::default();
    options.config.x_domain = Some((0.0, 100.0));
    options.config.y_domain = Some((0.0, 100.0));
    let mut chart = BubbleChart::new(options.with_data(vec![
        BubbleDatum::new(100.0, 0.0, 4.0),
        BubbleDatum::new(50.0, 50.0, 1.0),
    ]))
    .expect("chart");
    chart.finish_transitions();

    let (x0, x1) = chart.x_scale().expect("x").domain();
    assert!(x0 < 0.0 && x1 > 100.0);
    let inner = chart.grid().inner_width();
    for (_, cx, _, r) in circles(&chart) {
        assert!(cx - r >= -1e-9 && cx + r <= inner + 1e-9);
    }
}

#[test]
fn radius_range_and_type_are_configurable() {
    let mut chart = settled_chart(vec![
        BubbleDatum::new(1.0, 1.0, 1.0),
        BubbleDatum::new(2.0, 2.0, 4.0),
    ]);
    chart.set_r_range((0.0, 40.0)).expect("range");
    chart.set_r_type(ScaleType::Linear).expect("linear radius");
    chart.finish_transitions();

    let radii: Vec<f64> = circles(&chart).iter().map(|(_, _, _, r)| *r).collect();
    assert_relative_eq!(radii[0], 40.0);
    assert_relative_eq!(radii[1], 10.0);

    let err = chart.set_r_range((-1.0, 10.0)).err().expect("negative radius");
    assert!(matches!(err, ChartError::InvalidRange(_)));
    assert_eq!(chart.config().r_range, (0.0, 40.0));
}

#[test]
fn larger_bubbles_paint_underneath() {
    let chart = settled_chart(vec![
        BubbleDatum::new(1.0, 1.0, 2.0),
        BubbleDatum::new(2.0, 1.0, 8.0),
        BubbleDatum::new(3.0, 1.0, 5.0),
    ]);
    let radii: Vec<f64> = circles(&chart).iter().map(|(_, _, _, r)| *r).collect();
    assert!(radii.windows(2).all(|pair| pair[0] >= pair[1]));

    let svg = chart.to_svg().expect("svg");
    let first = svg.find("data-key=\"1\"").expect("largest bubble");
    let last = svg.find("data-key=\"0\"").expect("smallest bubble");
    assert!(first < last);
}

#[test]
fn entering_bubbles_grow_from_zero_radius_in_place() {
    let mut chart = BubbleChart::new(BubbleChartOptions::default()).expect("chart");
    chart
        .render(vec![BubbleDatum::new(2.0, 3.0, 5.0)])
        .expect("render");

    let (_, cx, cy, r) = circles(&chart)[0].clone();
    assert_eq!(r, 0.0);
    assert_relative_eq!(cx, chart.x_scale().expect("x").scale(2.0));
    assert_relative_eq!(cy, chart.y_scale().expect("y").scale(3.0));

    chart.tick(750.0);
    let (_, _, _, r) = circles(&chart)[0].clone();
    assert_relative_eq!(r, 12.5, epsilon = 1e-9);
    chart.tick(150.0);
    assert!(!chart.is_animating());
    assert_relative_eq!(circles(&chart)[0].3, 25.0);
}

#[test]
fn exiting_bubbles_shrink_then_disappear() {
    let mut chart = settled_chart(vec![
        BubbleDatum::new(1.0, 1.0, 3.0),
        BubbleDatum::new(2.0, 2.0, 3.0),
    ]);
    chart
        .render(vec![BubbleDatum::new(1.0, 1.0, 3.0)])
        .expect("render");

    let snapshot = chart.snapshot();
    assert!(snapshot.shape(&Key::Index(1)).expect("still present").exiting);

    chart.tick(150.0);
    match chart.snapshot().shape(&Key::Index(1)).map(|shape| shape.geometry) {
        Some(GeometrySnapshot::Bubble { r, .. }) => assert_relative_eq!(r, 12.5, epsilon = 1e-9),
        other => panic!("unexpected geometry {other:?}"),
    }
    chart.tick(150.0);
    assert!(chart.snapshot().shape(&Key::Index(1)).is_none());
}

#[test]
fn interrupted_render_restarts_from_current_values() {
    let mut chart = settled_chart(vec![BubbleDatum::new(1.0, 1.0, 4.0)]);
    chart
        .render(vec![BubbleDatum::new(1.0, 1.0, 4.0), BubbleDatum::new(3.0, 3.0, 1.0)])
        .expect("render");
    chart.tick(450.0);
    let midway = circles(&chart);

    chart
        .render(vec![BubbleDatum::new(1.0, 1.0, 4.0)])
        .expect("interrupting render");
    let snapshot = chart.snapshot();
    assert_eq!(snapshot.clock_ms, 450.0);
    let frozen = snapshot.shape(&Key::Index(0)).expect("kept bubble");
    let GeometrySnapshot::Bubble { cx, .. } = frozen.geometry else {
        panic!("bubble geometry expected");
    };
    assert_relative_eq!(cx, midway[0].1);

    chart.tick(900.0);
    assert!(!chart.is_animating());
    assert_eq!(circles(&chart).len(), 1);
}

#[test]
fn axes_cross_at_the_zero_point() {
    let chart = settled_chart(vec![
        BubbleDatum::new(-5.0, 2.0, 1.0),
        BubbleDatum::new(5.0, 8.0, 1.0),
    ]);
    let grid = *chart.grid();
    let x_zero = chart.x_scale().expect("x").scale(0.0);
    let y_zero = chart.y_scale().expect("y").scale(0.0);

    let svg = chart.to_svg().expect("svg");
    assert!(svg.contains(&format!(
        "class=\"axis x-axis\" transform=\"translate({},{})\"",
        grid.left(),
        grid.top() + y_zero
    )));
    assert!(svg.contains(&format!(
        "class=\"axis y-axis\" transform=\"translate({},{})\"",
        grid.left() + x_zero,
        grid.top()
    )));
}

#[test]
fn log_axes_skip_zero_and_keep_data_extent() {
    let mut options = BubbleChartOptions::default();
    options.config.x_type = ScaleType::Log { base: 10.0 };
    options.config.x_format = Some("~s".to_owned());
    let mut chart = BubbleChart::new(options.with_data(vec![
        BubbleDatum::new(10.0, 1.0, 1.0),
        BubbleDatum::new(1000.0, 2.0, 2.0),
    ]))
    .expect("chart");
    chart.finish_transitions();

    let (x0, x1) = chart.x_scale().expect("x").domain();
    assert!(x0 > 0.0 && x0 < 10.0);
    assert!(x1 > 1000.0);
    let labels: Vec<String> = chart
        .snapshot()
        .x_axis
        .ticks
        .iter()
        .map(|tick| tick.label.clone())
        .collect();
    assert!(labels.contains(&"100".to_owned()));
    assert!(labels.contains(&"1k".to_owned()));

    let err = chart
        .render(vec![BubbleDatum::new(0.0, 1.0, 1.0)])
        .err()
        .expect("zero on a log axis");
    assert!(matches!(err, ChartError::InvalidDomain(_)));
    assert_eq!(chart.data().len(), 2);
}

#[test]
fn custom_formatter_overrides_the_specifier() {
    let mut chart = settled_chart(vec![BubbleDatum::new(1.0, 2.0, 1.0)]);
    chart
        .set_y_formatter(TickFormat::custom(|value| format!("{value}u")))
        .expect("formatter");
    assert!(chart.snapshot().y_axis.ticks.iter().all(|tick| tick.label.ends_with('u')));
    assert_eq!(chart.config().y_format, None);

    chart.set_y_format(Some(".0%")).expect("specifier");
    assert!(chart.snapshot().y_axis.ticks.iter().all(|tick| tick.label.ends_with('%')));

    let err = chart.set_x_format(Some("z")).err().expect("bad specifier");
    assert!(matches!(err, ChartError::InvalidFormat(_)));
}

#[test]
fn custom_accessors_and_keys_drive_the_join() {
    #[derive(Debug, Clone)]
    struct Country {
        code: &'static str,
        gdp: f64,
        life: f64,
        population: f64,
    }

    let clicked = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&clicked);
    let on_click: PointerHandler<Country> = Arc::new(move |_: &PointerEvent, c: &Country| {
        *sink.lock().expect("lock") = Some(c.code);
    });

    let options = BubbleChartOptions::new(
        |c: &Country| c.gdp,
        |c: &Country| c.life,
        |c: &Country| c.population,
    )
    .with_keys(|c: &Country| Key::from(c.code))
    .with_tooltips(|c: &Country| format!("<b>{}</b>", c.code))
    .with_click(on_click)
    .with_data(vec![
        Country { code: "NO", gdp: 80.0, life: 83.0, population: 5.0 },
        Country { code: "IN", gdp: 2.0, life: 70.0, population: 1400.0 },
    ]);
    let mut chart = BubbleChart::new(options).expect("chart");
    chart.finish_transitions();

    let snapshot = chart.snapshot();
    let india = snapshot.shape(&Key::from("IN")).expect("IN");
    assert_eq!(india.tooltip.as_deref(), Some("<b>IN</b>"));
    let GeometrySnapshot::Bubble { cx, cy, .. } = india.geometry else {
        panic!("bubble geometry expected");
    };
    let grid = *chart.grid();
    assert_eq!(chart.click(grid.left() + cx, grid.top() + cy), Some(Key::from("IN")));
    assert_eq!(*clicked.lock().expect("lock"), Some("IN"));
    assert!(chart.to_svg().expect("svg").contains("&lt;b&gt;IN&lt;/b&gt;"));

    chart.select_bubbles(["NO"], Some("focus"));
    let snapshot = chart.snapshot();
    assert_eq!(snapshot.shape(&Key::from("NO")).expect("NO").classes, vec!["focus".to_owned()]);
    assert!(snapshot.shape(&Key::from("IN")).expect("IN").classes.is_empty());
}

#[test]
fn config_json_round_trip_and_resize() {
    let config = BubbleChartConfig::from_json_str(
        r#"{ "width": 500, "height": 400, "r_range": [2, 30], "x_type": { "type": "pow", "exponent": 2 } }"#,
    )
    .expect("config");
    assert_eq!(config.x_type, ScaleType::Pow { exponent: 2.0 });

    let mut chart = BubbleChart::new(
        BubbleChartOptions::default()
            .with_config(config)
            .with_data(vec![BubbleDatum::new(1.0, 1.0, 1.0), BubbleDatum::new(4.0, 3.0, 9.0)]),
    )
    .expect("chart");
    chart.set_height(300.0).expect("height");
    chart.set_title(Some("GDP"));
    chart.finish_transitions();

    let inner_height = chart.grid().inner_height();
    for (_, _, cy, r) in circles(&chart) {
        assert!(cy - r >= -1e-9 && cy + r <= inner_height + 1e-9);
    }
    let config = chart.config();
    assert_eq!(config.vis.height, 300.0);
    assert_eq!(config.vis.title.as_deref(), Some("GDP"));
    assert!(chart.to_svg().expect("svg").contains(">GDP</text>"));
}
