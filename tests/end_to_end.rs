use std::path::Path;

use approx::assert_abs_diff_eq;
use assert_matches::assert_matches;
use ellipsim::{
    config::JobConfig,
    degree,
    effective_medium::NanoparticleMaterial,
    error::EllipsError,
    export::{read_csv, save},
    optical_constants::MaterialLibrary,
    plot::{save_plot, PlotSelection, PsiDeltaCurve},
    simulate, simulate_lorentzian, simulate_maxwell_garnett,
    supervector::MixingAxis,
    LayerSpec,
};
use rand::{rngs::StdRng, SeedableRng};
use tempfile::TempDir;

const WAVELENGTHS: [f64; 3] = [400.0, 500.0, 600.0];

fn library() -> MaterialLibrary {
    MaterialLibrary::new(Path::new("files_for_testing/materials"))
}
fn silica_layer(library: &MaterialLibrary) -> LayerSpec {
    LayerSpec::new(library.get("sio2.nk").unwrap(), vec![50.0, 100.0]).unwrap()
}
fn assert_plausible(psi_delta: &ellipsim::Supervector) {
    assert!(psi_delta.is_finite());
    let nwave = psi_delta.nr_of_wavelengths();
    for ((row, _, _), value) in psi_delta.data().indexed_iter() {
        if row < nwave {
            assert!((0.0..=90.0).contains(value), "psi = {value}");
        } else {
            assert!((-180.0..=180.0).contains(value), "delta = {value}");
        }
    }
}

#[test]
fn plain_sweep() {
    let library = library();
    let substrate = library.get("sicr.nk").unwrap();
    let layer = silica_layer(&library);
    let s = simulate(&WAVELENGTHS, degree!(70.0), &substrate, &layer).unwrap();
    assert_eq!(s.shape(), vec![6, 2]);
    assert_eq!(s.wavelengths(), &WAVELENGTHS);
    assert_plausible(&s);
}

#[test]
fn plain_sweep_drops_wavelengths_outside_domain() {
    let library = library();
    let substrate = library.get("sicr.nk").unwrap();
    let layer = silica_layer(&library);
    let s = simulate(
        &[200.0, 400.0, 500.0, 600.0, 1200.0],
        degree!(70.0),
        &substrate,
        &layer,
    )
    .unwrap();
    assert_eq!(s.shape(), vec![6, 2]);
    assert_eq!(s.wavelengths(), &WAVELENGTHS);
}

#[test]
fn wavelengths_outside_domain() {
    let library = library();
    let substrate = library.get("sicr.nk").unwrap();
    let layer = silica_layer(&library);
    assert_matches!(
        simulate(&[100.0, 1500.0], degree!(70.0), &substrate, &layer),
        Err(EllipsError::OutOfDomain(_))
    );
}

#[test]
fn maxwell_garnett_sweep() {
    let library = library();
    let substrate = library.get("sicr.nk").unwrap();
    let gold = library.get("Au.nk").unwrap();
    let layer = silica_layer(&library);
    let s = simulate_maxwell_garnett(
        &WAVELENGTHS,
        degree!(70.0),
        &substrate,
        &layer,
        &gold,
        &[0.01, 0.05],
    )
    .unwrap();
    assert_eq!(s.shape(), vec![6, 2, 2]);
    assert_plausible(&s);
}

#[test]
fn maxwell_garnett_without_particles_is_plain() {
    let library = library();
    let substrate = library.get("sicr.nk").unwrap();
    let gold = library.get("Au.nk").unwrap();
    let layer = silica_layer(&library);
    let plain = simulate(&WAVELENGTHS, degree!(70.0), &substrate, &layer).unwrap();
    let mixed = simulate_maxwell_garnett(
        &WAVELENGTHS,
        degree!(70.0),
        &substrate,
        &layer,
        &gold,
        &[0.0],
    )
    .unwrap();
    for i in 0..WAVELENGTHS.len() {
        for t in 0..2 {
            assert_abs_diff_eq!(
                mixed.psi(i, t, 0).unwrap(),
                plain.psi(i, t, 0).unwrap(),
                epsilon = 1e-9
            );
            assert_abs_diff_eq!(
                mixed.delta(i, t, 0).unwrap(),
                plain.delta(i, t, 0).unwrap(),
                epsilon = 1e-9
            );
        }
    }
}

#[test]
fn lorentzian_sweep() {
    let library = library();
    let substrate = library.get("sicr.nk").unwrap();
    let layer = silica_layer(&library);
    let mut rng = StdRng::seed_from_u64(2024);
    let (s, oscillators) = simulate_lorentzian(
        &WAVELENGTHS,
        degree!(70.0),
        &substrate,
        &layer,
        NanoparticleMaterial::Gold.identifier(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(s.shape(), vec![6, 2, 30]);
    assert_eq!(oscillators.len(), 30);
    assert!(oscillators.iter().all(|o| o.linewidth() >= 1.0));
    assert!(oscillators.iter().all(|o| o.amplitude() >= 0.01));
    assert_eq!(s.mixing(), &MixingAxis::Oscillators(oscillators));
    assert!(s.is_finite());
}

#[test]
fn lorentzian_sweep_is_reproducible() {
    let library = library();
    let substrate = library.get("sicr.nk").unwrap();
    let layer = silica_layer(&library);
    let run = |seed| {
        simulate_lorentzian(
            &WAVELENGTHS,
            degree!(70.0),
            &substrate,
            &layer,
            "Ag.nk",
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap()
    };
    assert_eq!(run(5), run(5));
    assert_ne!(run(5).1, run(6).1);
}

#[test]
fn lorentzian_invalid_material() {
    let library = library();
    let substrate = library.get("sicr.nk").unwrap();
    let layer = silica_layer(&library);
    assert_matches!(
        simulate_lorentzian(
            &WAVELENGTHS,
            degree!(70.0),
            &substrate,
            &layer,
            "Pt.nk",
            &mut StdRng::seed_from_u64(1),
        ),
        Err(EllipsError::InvalidMaterial(_))
    );
}

#[test]
fn export_round_trip() {
    let library = library();
    let substrate = library.get("sicr.nk").unwrap();
    let gold = library.get("Au.nk").unwrap();
    let layer = silica_layer(&library);
    let tmp_dir = TempDir::new().unwrap();
    let plain = simulate(&WAVELENGTHS, degree!(70.0), &substrate, &layer).unwrap();
    let path = save(&plain, tmp_dir.path()).unwrap();
    assert_eq!(read_csv(&path).unwrap(), plain);
    let mixed = simulate_maxwell_garnett(
        &WAVELENGTHS,
        degree!(65.0),
        &substrate,
        &layer,
        &gold,
        &[0.01, 0.05],
    )
    .unwrap();
    let path = save(&mixed, tmp_dir.path()).unwrap();
    assert_eq!(read_csv(&path).unwrap(), mixed);
}

#[test]
fn plot_of_sweep_point() {
    let library = library();
    let substrate = library.get("sicr.nk").unwrap();
    let gold = library.get("Au.nk").unwrap();
    let layer = silica_layer(&library);
    let s = simulate_maxwell_garnett(
        &WAVELENGTHS,
        degree!(70.0),
        &substrate,
        &layer,
        &gold,
        &[0.01, 0.05],
    )
    .unwrap();
    let curve = PsiDeltaCurve::new(&s, 1, 1).unwrap();
    assert_eq!(
        curve.title(),
        "Ellipsometric data for thickness 100 nm, 5.0% volume fraction"
    );
    assert_eq!(curve.psi()[0], s.psi(0, 1, 1).unwrap());
    let tmp_dir = TempDir::new().unwrap();
    let selection = PlotSelection {
        thickness: 1,
        mixing: 1,
    };
    // text layout needs a system font, headless machines may not provide one
    match save_plot(&s, selection, tmp_dir.path()) {
        Ok(path) => assert!(path.is_file()),
        Err(e) => assert_matches!(e, EllipsError::Plot(_)),
    }
}

#[test]
fn repeated_sweep_values() {
    let library = library();
    let substrate = library.get("sicr.nk").unwrap();
    let layer = silica_layer(&library);
    assert_matches!(
        LayerSpec::new(library.get("sio2.nk").unwrap(), vec![50.0, 50.0]),
        Err(EllipsError::InvalidParameter(_))
    );
    assert_matches!(
        simulate(&[400.0, 400.0], degree!(70.0), &substrate, &layer),
        Err(EllipsError::InvalidParameter(_))
    );
}

#[test]
fn job_files() {
    for (file, shape) in [
        ("plain.yaml", vec![6, 2]),
        ("maxwell_garnett.yaml", vec![6, 2, 2]),
        ("lorentzian.yaml", vec![6, 2, 30]),
    ] {
        let path = Path::new("files_for_testing/config").join(file);
        let job = JobConfig::from_file(&path).unwrap();
        let s = job.run().unwrap();
        assert_eq!(s.shape(), shape, "{file}");
        assert!(s.is_finite());
    }
}
