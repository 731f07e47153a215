use keplerlab::simulation::params::OrbitalParameters;
use keplerlab::simulation::integrator::{integrate, integrate_phase, rk4_step};
use keplerlab::simulation::diagnostics::{derive_series, kepler_time, phase_from_radius, radius_at, relative_error};
use keplerlab::simulation::scenario::OrbitScenario;
use keplerlab::catalogue::table::{parse_table, CatalogueQuery, ColumnSpec};
use keplerlab::catalogue::reader::CatalogueReader;
use keplerlab::catalogue::sources::CatalogueSource;
use keplerlab::catalogue::error::CatalogueError;
use keplerlab::configuration::config::{
    load_scenario, scenario_path, CataloguePreset, CatalogueSourceConfig, OrbitConfig, ScenarioConfig,
};
use keplerlab::benchmark::benchmark::{bench_rk4_convergence, observed_order};

use approx::assert_relative_eq;

use std::f64::consts::{PI, TAU};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Sun-Mercury reference configuration
pub fn mercury_config() -> OrbitConfig {
    OrbitConfig {
        m1: 1.989e30,
        m2: 3.285e23,
        ecc: 0.21,
        L: 9e38,
        G: 6.67408e-11,
        steps: 100,
        step_size: None,
    }
}

pub fn mercury() -> OrbitalParameters {
    OrbitalParameters::from_config(&mercury_config())
}

/// Same masses and L as Mercury with a different eccentricity
pub fn with_ecc(ecc: f64) -> OrbitalParameters {
    let cfg = mercury_config();
    OrbitalParameters::new(cfg.m1, cfg.m2, ecc, cfg.L, cfg.G)
}

/// Three header lines, then `records` records of five physical lines each.
/// Record k starts on line 4 + 5k with the values `k+1  1.5k  -k`.
pub fn multiline_table(records: usize) -> String {
    let mut text = String::from("# synthetic catalogue\n# trig  flux  offset\n# ------------------\n");
    for k in 0..records {
        let kf = k as f64;
        text.push_str(&format!("{}  {}  {}\n", k + 1, 1.5 * kf, -kf));
        for j in 0..4 {
            text.push_str(&format!("continuation {k} {j} n/a\n"));
        }
    }
    text
}

/// Serve a single HTTP response on a local port and return its URL
pub fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            // drain the request head before answering
            let mut buf = [0u8; 1024];
            let mut request = Vec::new();
            loop {
                let n = stream.read(&mut buf).unwrap_or(0);
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "{status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{addr}/table.txt")
}

pub fn local_reader() -> CatalogueReader {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap();
    CatalogueReader::with_client(client)
}

// ==================================================================================
// Orbital parameter tests
// ==================================================================================

#[test]
fn mercury_period_matches_kepler_third_law() {
    let p = mercury();
    let mercury_year = 87.969 * 86_400.0;

    assert!(relative_error(p.T, mercury_year) < 0.05, "T = {} s", p.T);
}

#[test]
fn derived_constants_are_consistent() {
    let p = mercury();

    assert_relative_eq!(p.M, p.m1 + p.m2);
    assert_relative_eq!(p.mu, p.m1 * p.m2 / (p.m1 + p.m2));
    assert_relative_eq!(p.r_l, p.L * p.L / (p.G * p.M * p.mu * p.mu), max_relative = 1e-12);

    // bound orbit: E = -G M mu / 2a
    assert!(p.E < 0.0);
    assert_relative_eq!(p.E, -p.G * p.M * p.mu / (2.0 * p.a), max_relative = 1e-10);

    assert_relative_eq!(p.periapsis(), p.a * (1.0 - p.ecc), max_relative = 1e-12);
    assert_relative_eq!(p.apoapsis(), p.a * (1.0 + p.ecc), max_relative = 1e-12);
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn rk4_step_matches_exponential() {
    let y = rk4_step(1.0, 0.1, &|y: f64| y);
    assert!((y - 0.1_f64.exp()).abs() < 1e-6, "got {}", y);
}

#[test]
fn integrate_generic_rate_over_fixed_grid() {
    let series = integrate(1.0, 0.1, 10, &|y: f64| y);

    assert_eq!(series.len(), 11);
    assert_relative_eq!(series.t[10], 1.0, max_relative = 1e-12);
    assert!((series.phi[10] - 1.0_f64.exp()).abs() < 1e-5);
}

#[test]
fn phase_series_has_fixed_length_and_starts_at_periapsis() {
    for ecc in [0.0, 0.21, 0.6, 0.9] {
        let p = with_ecc(ecc);
        let scenario = OrbitScenario::with_steps(p, 100).unwrap();
        let phase = integrate_phase(&p, scenario.h);

        assert_eq!(phase.len(), 101, "e = {}", ecc);
        assert_eq!(phase.steps(), 100);
        assert_eq!(phase.phi[0], 0.0);
        assert_eq!(phase.t[0], 0.0);

        for w in phase.phi.windows(2) {
            assert!(w[1] >= w[0], "phase decreased at e = {}", ecc);
        }
        for (i, t) in phase.t.iter().enumerate() {
            assert_relative_eq!(*t, i as f64 * scenario.h, max_relative = 1e-12);
        }
    }
}

#[test]
fn one_period_returns_to_periapsis() {
    let p = mercury();
    let phase = integrate_phase(&p, p.T / 100.0);

    let last = *phase.phi.last().unwrap();
    assert!((last - TAU).abs() < 1e-4, "phi_N = {}", last);
}

#[test]
fn circular_orbit_advances_uniformly() {
    let p = with_ecc(0.0);
    let phase = integrate_phase(&p, p.T / 50.0);

    for (phi, t) in phase.phi.iter().zip(phase.t.iter()) {
        assert!((phi - p.mean_motion() * t).abs() < 1e-10);
    }
}

#[test]
fn explicit_step_size_rounds_up_to_cover_period() {
    let mut cfg = mercury_config();
    cfg.step_size = Some(mercury().T / 40.5);

    let scenario = OrbitScenario::build_scenario(&cfg).unwrap();
    assert_eq!(scenario.steps, 41);

    let run = scenario.run();
    assert_eq!(run.phase.len(), 42);
    assert!(*run.phase.t.last().unwrap() >= run.parameters.T);
}

#[test]
fn invalid_step_settings_are_rejected() {
    let mut cfg = mercury_config();
    cfg.steps = 0;
    assert!(OrbitScenario::build_scenario(&cfg).is_err());

    let mut cfg = mercury_config();
    cfg.step_size = Some(-1.0);
    assert!(OrbitScenario::build_scenario(&cfg).is_err());

    let mut cfg = mercury_config();
    cfg.step_size = Some(f64::NAN);
    assert!(OrbitScenario::build_scenario(&cfg).is_err());
}

// ==================================================================================
// Conservation tests
// ==================================================================================

#[test]
fn mercury_conserves_energy_and_momentum() {
    let scenario = OrbitScenario::build_scenario(&mercury_config()).unwrap();
    let run = scenario.run();
    let s = run.summary;

    assert!(s.max_energy_error < 0.01, "energy error {}", s.max_energy_error);
    assert!(s.max_momentum_error < 0.01, "momentum error {}", s.max_momentum_error);
    assert!(s.max_time_error < 1e-4, "time error {}", s.max_time_error);
}

#[test]
fn derived_series_shapes_and_positions() {
    let p = mercury();
    let phase = integrate_phase(&p, p.T / 100.0);
    let d = derive_series(&p, &phase);

    let n = phase.len();
    assert_eq!(d.r.len(), n);
    assert_eq!(d.r_dot.len(), n);
    assert_eq!(d.phi_dot.len(), n);
    assert_eq!(d.energy_error.len(), n);
    assert_eq!(d.momentum_error.len(), n);
    assert_eq!(d.time_error.len(), n);

    // starts at periapsis on the positive x axis
    assert_relative_eq!(d.positions[0].x, p.periapsis(), max_relative = 1e-12);
    assert_eq!(d.positions[0].y, 0.0);

    for (pos, r) in d.positions.iter().zip(d.r.iter()) {
        assert_relative_eq!(pos.norm(), *r, max_relative = 1e-12);
        assert!(*r >= p.periapsis() * (1.0 - 1e-12) && *r <= p.apoapsis() * (1.0 + 1e-12));
    }
}

#[test]
fn radius_phase_round_trip() {
    let p = mercury();
    let phases = (1..30).map(|i| 0.1 * i as f64).chain((33..62).map(|i| 0.1 * i as f64));

    for phi in phases {
        let r = radius_at(&p, phi);
        let back = phase_from_radius(&p, r, phi <= PI);
        assert!((back - phi).abs() < 1e-7, "phi = {}, back = {}", phi, back);
    }
}

#[test]
fn kepler_time_landmarks() {
    let p = mercury();

    assert_eq!(kepler_time(&p, 0.0), 0.0);
    assert_relative_eq!(kepler_time(&p, PI), 0.5 * p.T, max_relative = 1e-12);
    assert_relative_eq!(kepler_time(&p, TAU), p.T, max_relative = 1e-12);
    assert_relative_eq!(kepler_time(&p, TAU + PI), 1.5 * p.T, max_relative = 1e-12);

    // faster near periapsis: first quarter of phase takes less than a quarter period
    assert!(kepler_time(&p, 0.5 * PI) < 0.25 * p.T);
}

#[test]
fn halving_step_shows_fourth_order_convergence() {
    let rows = bench_rk4_convergence(&mercury(), 100, 3).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].steps, 100);
    assert_eq!(rows[2].steps, 400);

    for pair in rows.windows(2) {
        let order = observed_order(pair[0].time_error, pair[1].time_error);
        assert!(order > 3.0 && order < 5.0, "observed order {}", order);

        // finite-difference diagnostics still improve
        assert!(pair[1].energy_error < pair[0].energy_error);
        assert!(pair[1].momentum_error < pair[0].momentum_error);
    }
}

// ==================================================================================
// Catalogue tests
// ==================================================================================

#[test]
fn stride_and_offset_select_record_lines() {
    let text = multiline_table(4);
    let query = CatalogueQuery::new(&[1, 2, 3], 4, 5);
    let table = parse_table(&text, &query).unwrap();

    assert_eq!(table.rows(), 4);
    assert_eq!(table.columns[0].values, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(table.columns[1].values, vec![0.0, 1.5, 3.0, 4.5]);
    assert_eq!(table.columns[2].values, vec![0.0, -1.0, -2.0, -3.0]);
    assert_eq!(table.columns[1].name, "col2");
}

#[test]
fn named_columns_and_csv_output() {
    let text = "10 0.25\n20 0.5\n";
    let query = CatalogueQuery {
        columns: vec![ColumnSpec::named(1, "trigger"), ColumnSpec::named(2, "t90")],
        start: 1,
        step: 1,
    };
    let table = parse_table(text, &query).unwrap();

    assert_eq!(table.column("t90"), Some(&[0.25, 0.5][..]));
    assert!(table.column("missing").is_none());

    let mut out = Vec::new();
    table.write_csv(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "trigger,t90\n10,0.25\n20,0.5\n");
}

#[test]
fn start_past_end_gives_empty_columns() {
    let table = parse_table("1 2\n3 4\n", &CatalogueQuery::new(&[1], 5, 1)).unwrap();
    assert_eq!(table.rows(), 0);
    assert_eq!(table.columns.len(), 1);
}

#[test]
fn non_numeric_token_reports_line_and_column() {
    let err = parse_table("1 2\n3 x\n", &CatalogueQuery::new(&[2], 1, 1)).unwrap_err();
    match err {
        CatalogueError::ParseFloat { line, column, token, .. } => {
            assert_eq!(line, 2);
            assert_eq!(column, 2);
            assert_eq!(token, "x");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn short_row_reports_missing_column() {
    let text = multiline_table(2);
    // line 5 is a continuation line with only four tokens
    let err = parse_table(&text, &CatalogueQuery::new(&[5], 5, 5)).unwrap_err();
    assert!(matches!(err, CatalogueError::MissingColumn { line: 5, column: 5 }));
}

#[test]
fn zero_indices_are_rejected() {
    let text = "1 2\n";
    assert!(matches!(
        parse_table(text, &CatalogueQuery::new(&[0], 1, 1)),
        Err(CatalogueError::InvalidColumn { column: 0 })
    ));
    assert!(matches!(
        parse_table(text, &CatalogueQuery::new(&[1], 0, 1)),
        Err(CatalogueError::InvalidStart)
    ));
    assert!(matches!(
        parse_table(text, &CatalogueQuery::new(&[1], 1, 0)),
        Err(CatalogueError::InvalidStep)
    ));
}

#[test]
fn reader_fetches_and_parses_over_http() {
    let url = serve_once("HTTP/1.1 200 OK", "# header\n105 0.192\n107 4.8\n108 1.2\n");
    let table = local_reader()
        .read(&url, &CatalogueQuery::new(&[1, 2], 2, 1))
        .unwrap();

    assert_eq!(table.columns[0].values, vec![105.0, 107.0, 108.0]);
    assert_eq!(table.columns[1].values, vec![0.192, 4.8, 1.2]);
}

#[test]
fn reader_fails_on_http_error_status() {
    let url = serve_once("HTTP/1.1 404 Not Found", "gone");
    let err = local_reader().fetch_text(&url).unwrap_err();

    match err {
        CatalogueError::Status { status, url: failed } => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn reader_fails_when_host_unreachable() {
    // bind then drop to get a port nobody listens on
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let url = format!("http://127.0.0.1:{port}/table.txt");

    let err = local_reader().fetch_text(&url).unwrap_err();
    assert!(matches!(err, CatalogueError::Request { .. }));
}

#[test]
fn preset_sources_point_at_batse_tables() {
    assert!(CatalogueSource::Basic.url().ends_with("/basic_table.txt"));
    assert!(CatalogueSource::Flux.url().ends_with("/flux_table.txt"));
    assert!(CatalogueSource::Duration.url().ends_with("/duration_table.txt"));
    assert_eq!(CatalogueSource::Url("http://x/t.txt".into()).url(), "http://x/t.txt");
}

// ==================================================================================
// Configuration tests
// ==================================================================================

#[test]
fn scenario_yaml_with_defaults() {
    let yaml = r#"
orbit:
  m1: 2.0
  m2: 1.0
  ecc: 0.1
  L: 3.0
  G: 1.0
catalogue:
  source: { url: "http://example.invalid/t.txt" }
  start: 4
  step: 5
  columns:
    - index: 2
      name: flux
    - index: 3
"#;
    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();

    let orbit = cfg.orbit.unwrap();
    assert_eq!(orbit.steps, 100);
    assert!(orbit.step_size.is_none());
    assert_eq!(orbit.L, 3.0);

    let catalogue = cfg.catalogue.unwrap();
    assert_eq!(catalogue.timeout_secs, 30);
    assert_eq!(catalogue.source(), CatalogueSource::Url("http://example.invalid/t.txt".into()));

    let query = catalogue.query();
    assert_eq!(query.start, 4);
    assert_eq!(query.step, 5);
    assert_eq!(query.columns, vec![ColumnSpec::named(2, "flux"), ColumnSpec::new(3)]);
}

#[test]
fn preset_source_names_deserialize() {
    let yaml = "source: flux\nstart: 1\ncolumns:\n  - index: 1\n";
    let cfg: keplerlab::configuration::config::CatalogueConfig = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(cfg.source, CatalogueSourceConfig::Preset(CataloguePreset::Flux));
    assert_eq!(cfg.step, 1);
}

#[test]
fn bundled_mercury_scenario_loads() {
    let cfg = load_scenario(&scenario_path("mercury.yaml")).unwrap();
    let orbit = cfg.orbit.unwrap();

    assert_eq!(orbit.ecc, 0.21);
    assert_eq!(orbit.steps, 100);
    assert!(cfg.catalogue.is_none());
}

#[test]
fn scenario_loads_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("circle.yaml");
    std::fs::write(&path, "orbit:\n  m1: 1.0\n  m2: 1.0\n  ecc: 0.0\n  L: 1.0\n  G: 1.0\n  steps: 20\n").unwrap();

    let resolved = scenario_path(path.to_str().unwrap());
    assert_eq!(resolved, path);

    let cfg = load_scenario(&resolved).unwrap();
    let run = OrbitScenario::build_scenario(&cfg.orbit.unwrap()).unwrap().run();
    assert_eq!(run.phase.len(), 21);
}

#[test]
fn missing_scenario_is_an_error() {
    assert!(load_scenario(&scenario_path("does_not_exist.yaml")).is_err());
}
