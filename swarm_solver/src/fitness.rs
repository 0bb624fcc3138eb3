use argmin::core::{CostFunction, Error as ArgminError};
use nalgebra::DVector;
use tracing::debug;

/// Cost assigned to a point whose evaluation failed.
pub const WORST_COST: f64 = f64::MAX;

/// A cost function over the search space. Lower is better.
///
/// Evaluation may fail (e.g. the point is outside the function's domain);
/// the swarm treats such points as maximally unfit instead of aborting.
pub trait FitnessFunction {
    fn cost(&self, position: &DVector<f64>) -> Result<f64, ArgminError>;
}

impl<F> FitnessFunction for F
where
    F: Fn(&DVector<f64>) -> Result<f64, ArgminError>,
{
    fn cost(&self, position: &DVector<f64>) -> Result<f64, ArgminError> {
        self(position)
    }
}

/// Adapts any `argmin` cost function over `DVector<f64>`.
#[derive(Clone, Debug)]
pub struct ArgminCost<C>(pub C);

impl<C> FitnessFunction for ArgminCost<C>
where
    C: CostFunction<Param = DVector<f64>, Output = f64>,
{
    fn cost(&self, position: &DVector<f64>) -> Result<f64, ArgminError> {
        self.0.cost(position)
    }
}

/// Adapts a cost function that cannot fail.
#[derive(Clone, Debug)]
pub struct Infallible<F>(pub F);

impl<F> FitnessFunction for Infallible<F>
where
    F: Fn(&DVector<f64>) -> f64,
{
    fn cost(&self, position: &DVector<f64>) -> Result<f64, ArgminError> {
        Ok((self.0)(position))
    }
}

/// Evaluates `f` at `position`, mapping failures and NaN to [`WORST_COST`].
pub fn evaluate<F: FitnessFunction + ?Sized>(f: &F, position: &DVector<f64>) -> f64 {
    match f.cost(position) {
        Ok(cost) if cost.is_nan() => {
            debug!(position = ?position.as_slice(), "fitness returned NaN; using worst cost");
            WORST_COST
        }
        Ok(cost) => cost,
        Err(err) => {
            debug!(position = ?position.as_slice(), %err, "fitness evaluation failed; using worst cost");
            WORST_COST
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Paraboloid;

    impl CostFunction for Paraboloid {
        type Param = DVector<f64>;
        type Output = f64;

        fn cost(&self, p: &Self::Param) -> Result<Self::Output, ArgminError> {
            Ok(p.iter().map(|x| (x - 1.0) * (x - 1.0)).sum())
        }
    }

    #[test]
    fn test_argmin_cost_function_adapter() {
        let f = ArgminCost(Paraboloid);
        assert_eq!(evaluate(&f, &DVector::from_vec(vec![1.0, 3.0])), 4.0);
    }

    #[test]
    fn test_closure_failure_maps_to_worst_cost() {
        let table = [3.0, 1.0, 2.0];
        let f = |p: &DVector<f64>| -> Result<f64, ArgminError> {
            let idx = p[0].round();
            if idx < 0.0 || idx as usize >= table.len() {
                bail!("index {} outside lookup table", idx);
            }
            Ok(table[idx as usize])
        };
        assert_eq!(evaluate(&f, &DVector::from_vec(vec![1.2])), 1.0);
        assert_eq!(evaluate(&f, &DVector::from_vec(vec![7.0])), WORST_COST);
        assert_eq!(evaluate(&f, &DVector::from_vec(vec![-4.0])), WORST_COST);
    }

    #[test]
    fn test_nan_maps_to_worst_cost() {
        let f = Infallible(|_: &DVector<f64>| f64::NAN);
        assert_eq!(evaluate(&f, &DVector::from_vec(vec![0.0])), WORST_COST);
    }
}
