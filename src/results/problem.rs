//! Problem interface consumed by the results store

/// Test-case problem able to score a candidate solution.
///
/// Implemented by the problem-set loader. A `None` solution means the
/// solver returned nothing, in which case both errors must be `None`.
pub trait Problem {
    /// Solution type returned by solvers for this problem.
    type Solution;

    /// Test-case identifier, used as the `problem` column.
    fn name(&self) -> &str;

    /// Absolute difference between the solution cost and the reference
    /// optimal cost.
    fn cost_error(&self, solution: Option<&Self::Solution>) -> Option<f64>;

    /// Largest constraint violation of the solution.
    fn primal_error(&self, solution: Option<&Self::Solution>) -> Option<f64>;
}
