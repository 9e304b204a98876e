//! File-level export/import behaviour of the gnuplot text format.

use flowline_advect::{Advection, AdvectionMethod};
use flowline_core::{AdvectError, FileError, Particle, Vec3};
use flowline_test_utils::{line_seeds, ConstScalar, TempFile, UniformFlow};

/// Two streams with three particles each.
fn two_by_three() -> Advection {
    let mut adv = Advection::new();
    adv.use_seed_particles(&line_seeds(2, 1.0, 0.0));
    let field = UniformFlow::new(Vec3::X);
    for _ in 0..2 {
        adv.advect_one_step(&field, 0.5, AdvectionMethod::Rk4)
            .unwrap();
    }
    adv
}

#[test]
fn export_then_import_flattens_streams_into_seeds() {
    let file = TempFile::new("roundtrip");
    let mut adv = two_by_three();
    adv.calculate_particle_values(&ConstScalar(2.0), false)
        .unwrap();
    adv.output_streams_gnuplot(file.path(), false).unwrap();

    let mut imported = Advection::new();
    let n = imported.input_streams_gnuplot(file.path()).unwrap();
    assert_eq!(n, 6);
    assert_eq!(imported.number_of_streams(), 6);

    let originals: Vec<&Particle> = adv.streams().flatten().collect();
    for (i, orig) in originals.iter().enumerate() {
        let s = imported.stream_at(i).unwrap();
        assert_eq!(s.len(), 1);
        assert!((s[0].location - orig.location).length() < 1e-5);
        assert!((s[0].time - orig.time).abs() < 1e-5);
        // Values are written but not read back.
        assert_eq!(s[0].value, 0.0);
    }
}

#[test]
fn separators_are_not_exported() {
    let file = TempFile::new("separators");
    let field = UniformFlow::bounded(Vec3::X, Vec3::ZERO, Vec3::splat(10.0));
    let mut adv = Advection::new();
    adv.use_seed_particles(&[Particle::new(Vec3::new(10.5, 5.0, 5.0), 0.0)]);
    adv.set_x_periodicity(true, 0.0, 10.0);
    adv.advect_one_step(&field, 1.0, AdvectionMethod::Euler)
        .unwrap();
    assert_eq!(adv.stream_at(0).unwrap().len(), 3);

    adv.output_streams_gnuplot(file.path(), false).unwrap();
    let mut imported = Advection::new();
    assert_eq!(imported.input_streams_gnuplot(file.path()).unwrap(), 2);
}

#[test]
fn append_mode_keeps_earlier_output() {
    let file = TempFile::new("append");
    let adv = two_by_three();
    adv.output_streams_gnuplot(file.path(), false).unwrap();
    adv.output_streams_gnuplot(file.path(), true).unwrap();

    let text = file.read();
    assert_eq!(text.matches("# X-position").count(), 2);

    let mut imported = Advection::new();
    assert_eq!(imported.input_streams_gnuplot(file.path()).unwrap(), 12);

    // Overwrite mode truncates.
    adv.output_streams_gnuplot(file.path(), false).unwrap();
    assert_eq!(file.read().matches("# X-position").count(), 1);
}

#[test]
fn malformed_import_leaves_state_untouched() {
    let file = TempFile::new("malformed");
    file.write("0.0, 0.0, 0.0\n1.0, abc, 3.0\n");

    let mut adv = two_by_three();
    let before: Vec<Vec<Particle>> = adv.streams().map(|s| s.to_vec()).collect();

    let err = adv.input_streams_gnuplot(file.path()).unwrap_err();
    assert!(matches!(
        err,
        AdvectError::File(FileError::MalformedLine { line: 2, .. })
    ));
    let after: Vec<Vec<Particle>> = adv.streams().map(|s| s.to_vec()).collect();
    assert_eq!(before, after);
}

#[test]
fn empty_seed_file_leaves_state_untouched() {
    let file = TempFile::new("empty");
    file.write("# nothing here\n\n");

    let mut adv = two_by_three();
    assert_eq!(adv.input_streams_gnuplot(file.path()).unwrap(), 0);
    assert_eq!(adv.number_of_streams(), 2);
    assert_eq!(adv.max_num_of_steps(), 3);
}

#[test]
fn missing_file_is_a_file_error() {
    let file = TempFile::new("missing");
    let mut adv = Advection::new();
    assert!(matches!(
        adv.input_streams_gnuplot(file.path()),
        Err(AdvectError::File(FileError::Io(_)))
    ));
}

#[test]
fn unwritable_path_is_a_file_error() {
    let file = TempFile::new("dir");
    let bad = file.path().join("no-such-dir").join("out.txt");
    let adv = two_by_three();
    assert!(matches!(
        adv.output_streams_gnuplot(&bad, false),
        Err(AdvectError::File(FileError::Io(_)))
    ));
}
