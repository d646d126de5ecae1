use std::io::Write;
use std::process::Command;

use cp_matching::error::SolverError;
use cp_matching::problem::{Bounds, LinearProgram};
use cp_matching::solvers::{
    status_to_result, CbcSolver, MicroLpSolver, SolverTrait, SolverWithSolutionParsing, Status,
};

/// min -x0 + x1 with -10 <= x0 <= -1, 4 <= x1 <= 7 and x0 - x1 <= -4.5, bounds written as rows
fn small_problem() -> LinearProgram {
    let mut pb = LinearProgram::new("small_problem", vec![-1., 1.], Bounds::FREE);
    pb.add_upper_bound(vec![-1., 0.], 10.);
    pb.add_upper_bound(vec![1., 0.], -1.);
    pb.add_upper_bound(vec![0., -1.], -4.);
    pb.add_upper_bound(vec![0., 1.], 7.);
    pb.add_upper_bound(vec![1., -1.], -4.5);
    pb
}

fn solve_small_problem_with_solver<S: SolverTrait>(solver: &S) {
    let solution = solver.run(&small_problem()).expect("Failed to run solver");
    assert!((solution.x[0] + 1.).abs() < 1e-6);
    assert!((solution.x[1] - 4.).abs() < 1e-6);
    assert!((solution.objective - 5.).abs() < 1e-6);
    assert_eq!(solution.slack.len(), 5);
    assert!((solution.slack[0] - 9.).abs() < 1e-6);
    assert!(solution.slack[1].abs() < 1e-6);
}

fn infeasible<S: SolverTrait>(solver: &S) {
    let mut pb = LinearProgram::new("impossible", vec![-1.], Bounds::NON_NEGATIVE);
    pb.add_upper_bound(vec![1.], -5.);
    match solver.run(&pb) {
        Err(SolverError::Infeasible(_)) => {}
        other => panic!("expected an infeasible problem, got {:?}", other),
    }
}

#[test]
fn solve_problem_with_microlp() {
    let solver = MicroLpSolver::new();
    solve_small_problem_with_solver(&solver);
    infeasible(&solver);
}

#[test]
fn boxed_solvers_are_solvers() {
    let solver: Box<dyn SolverTrait> = Box::new(MicroLpSolver::new());
    solve_small_problem_with_solver(&solver);
}

#[test]
#[ignore = "needs the cbc program on the PATH"]
fn solve_problem_with_cbc() {
    assert!(Command::new("cbc").arg("-quit").output().is_ok());
    let solver = CbcSolver::default();
    solve_small_problem_with_solver(&solver);
    infeasible(&solver);
}

fn solution_file(content: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(".sol").tempfile().unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

#[test]
fn cbc_optimal() {
    let f = solution_file(
        "Optimal - objective value 5.00000000
      0 x0                       5                       1
      2 x2                     0.5                       0
",
    );
    let pb = LinearProgram::new("three", vec![1., 0., 0.], Bounds::NON_NEGATIVE);
    let (status, values) = CbcSolver::new().read_solution(f.path(), &pb).unwrap();
    assert_eq!(status, Status::Optimal);
    assert_eq!(values, vec![5., 0., 0.5]);
    let solution = status_to_result(status, &pb, values).unwrap();
    assert_eq!(solution.objective, 5.);
}

#[test]
fn cbc_infeasible() {
    let f = solution_file(
        "Infeasible - objective value 0.00000000
**       0 x0                        2                       0
",
    );
    let pb = LinearProgram::new("one", vec![1.], Bounds::NON_NEGATIVE);
    let (status, values) = CbcSolver::new().read_solution(f.path(), &pb).unwrap();
    assert_eq!(status, Status::Infeasible);
    assert_eq!(values, vec![2.]);
    assert!(matches!(
        status_to_result(status, &pb, values),
        Err(SolverError::Infeasible(_))
    ));
}

#[test]
fn cbc_stopped_is_not_an_optimum() {
    let f = solution_file("Stopped on time - objective value 3.00000000\n");
    let pb = LinearProgram::new("one", vec![1.], Bounds::NON_NEGATIVE);
    let (status, values) = CbcSolver::new().read_solution(f.path(), &pb).unwrap();
    assert_eq!(status, Status::SubOptimal);
    assert!(matches!(
        status_to_result(status, &pb, values),
        Err(SolverError::Internal(_))
    ));
}

#[test]
fn cbc_unknown_column() {
    let f = solution_file(
        "Optimal - objective value 1.00000000
      0 y                        1                       0
",
    );
    let pb = LinearProgram::new("one", vec![1.], Bounds::NON_NEGATIVE);
    assert!(matches!(
        CbcSolver::new().read_solution(f.path(), &pb),
        Err(SolverError::Parse(_))
    ));
}
