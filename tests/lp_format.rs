use cp_matching::cut_family::{Cut, CutFamily};
use cp_matching::graph::Graph;
use cp_matching::lp_format::LpProblem;
use cp_matching::primal::primal_program;
use cp_matching::problem::{Bounds, LinearProgram};

#[test]
fn simple_problem() {
    let mut pb = LinearProgram::new("my_problem", vec![2., 1., 0.], Bounds::NON_NEGATIVE);
    pb.add_upper_bound(vec![-1., -1., -1.], -5.);
    pb.add_equality(vec![1., 0., -1.], 0.);
    let expected_str = "\\ my_problem

Minimize
  obj: 2 x0 + x1

Subject To
  u0: -x0 - x1 - x2 <= -5
  e0: x0 - x2 = 0

Bounds
  0 <= x0
  0 <= x1
  0 <= x2

End
";
    assert_eq!(pb.display_lp().to_string(), expected_str);
}

#[test]
fn free_variables_without_constraints() {
    let pb = LinearProgram::new("free", vec![0.5, -3.], Bounds::FREE);
    let expected_str = "\\ free

Minimize
  obj: 0.5 x0 - 3 x1

Bounds
  x0 free
  x1 free

End
";
    assert_eq!(pb.display_lp().to_string(), expected_str);
}

#[test]
fn primal_of_a_path() {
    let g = Graph::from_edges(4, &[(0, 1, 3.), (1, 2, 1.), (2, 3, 4.)]);
    let family = CutFamily::from_cuts(vec![Cut::new(vec![0, 1, 2])]);
    let expected_str = "\\ primal_min_cost

Minimize
  obj: 3 x0 + x1 + 4 x2

Subject To
  u0: -x2 <= -1
  e0: x0 = 1
  e1: x0 + x1 = 1
  e2: x1 + x2 = 1
  e3: x2 = 1

Bounds
  0 <= x0
  0 <= x1
  0 <= x2

End
";
    assert_eq!(
        primal_program(&g, &family).display_lp().to_string(),
        expected_str
    );
}

#[test]
fn written_to_a_file() {
    let pb = LinearProgram::new("on_disk", vec![1.], Bounds::NON_NEGATIVE);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("on_disk.lp");
    pb.write_lp_file(&path).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        pb.display_lp().to_string()
    );
    let tmp = pb.to_tmp_file().unwrap();
    assert!(tmp.path().to_string_lossy().ends_with(".lp"));
}
