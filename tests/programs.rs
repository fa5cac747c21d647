use mtsim::{ProgramLoader, ProgramManager, TuringMachine, DEFAULT_MAX_STEPS};
use std::path::Path;

fn programs_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/programs"))
}

#[test]
fn test_program_files_match_embedded_programs() {
    let results = ProgramLoader::load_definitions(programs_dir());
    assert_eq!(results.len(), ProgramManager::get_program_count());

    for result in results {
        let (path, definition) = result.unwrap();
        let name = path.file_stem().unwrap().to_str().unwrap();
        assert_eq!(
            ProgramManager::get_program_by_name(name).unwrap(),
            definition
        );
    }
}

#[test]
fn test_unary_copy() {
    let mut machine = ProgramManager::machine("unary-copy").unwrap();

    assert_eq!(machine.run("111", DEFAULT_MAX_STEPS), Ok(true));
    assert!(machine.is_accepted());
    assert_eq!(machine.step_count(), 4);
    assert_eq!(machine.tapes_content(), vec!["111.", "111."]);
    assert_eq!(
        machine.tapes_content_with_head(),
        vec!["111[.]", "111[.]"]
    );
    assert_eq!(machine.result_from_first_tape(), "111");

    assert_eq!(machine.run("", DEFAULT_MAX_STEPS), Ok(true));
    assert!(machine.is_accepted());
    assert_eq!(machine.step_count(), 1);
    assert_eq!(machine.tapes_content(), vec![".", "."]);
    assert_eq!(machine.result_from_first_tape(), ".");
}

#[test]
fn test_even_ones() {
    let mut machine = ProgramManager::machine("even-ones").unwrap();

    for (input, accepted) in [
        ("", true),
        ("0", true),
        ("11", true),
        ("1", false),
        ("0100", false),
        ("1001", true),
    ] {
        assert_eq!(machine.run(input, DEFAULT_MAX_STEPS), Ok(true), "input {input:?}");
        assert_eq!(machine.is_accepted(), accepted, "input {input:?}");
    }

    // Rejected by getting stuck in `odd` on the trailing blank.
    machine.run("1", DEFAULT_MAX_STEPS).unwrap();
    assert_eq!(machine.state(), "odd");
    assert_eq!(machine.step_count(), 1);
    assert_eq!(machine.tapes_content(), vec!["1_"]);
}

#[test]
fn test_step_budget_is_not_an_error() {
    let mut machine = ProgramManager::machine("binary-increment").unwrap();

    assert_eq!(machine.run("1011", 3), Ok(false));
    assert_eq!(machine.step_count(), 3);
    assert_eq!(machine.state(), "scan");
    assert!(!machine.is_halted());

    let report = machine.report("1011", false);
    assert!(!report.accepted);
    assert!(!report.halted);
}

#[test]
fn test_machines_are_reusable_after_errors() {
    let mut machine: TuringMachine = ProgramManager::machine("even-ones").unwrap();

    assert!(machine.run("12", DEFAULT_MAX_STEPS).is_err());
    assert_eq!(machine.run("11", DEFAULT_MAX_STEPS), Ok(true));
    assert!(machine.is_accepted());
}
