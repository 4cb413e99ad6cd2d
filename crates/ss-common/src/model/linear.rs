use super::{ensure_finite, InferenceError, InvalidModel, OutputKind, Predictor, RawOutput};

/// Ordinary linear regression: `intercept + Σ coefficient·x`.
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(
        coefficients: Vec<f64>,
        intercept: f64,
        input_len: usize,
    ) -> Result<Self, InvalidModel> {
        if coefficients.len() != input_len {
            return Err(InvalidModel::CoefficientCount {
                expected: input_len,
                found: coefficients.len(),
            });
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(InvalidModel::NonFinite {
                model: "linear_regressor",
            });
        }

        Ok(Self {
            coefficients,
            intercept,
        })
    }
}

impl Predictor for LinearRegressor {
    fn name(&self) -> &'static str {
        "linear_regressor"
    }

    fn output_kind(&self) -> OutputKind {
        OutputKind::Regression
    }

    fn input_len(&self) -> usize {
        self.coefficients.len()
    }

    fn infer(&self, features: &[f64]) -> Result<RawOutput, InferenceError> {
        self.check_input(features)?;

        let value = self
            .coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (c, x)| acc + c * x);

        Ok(RawOutput::Regression(ensure_finite(value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_weighted_sum_plus_intercept() {
        let model = LinearRegressor::new(vec![0.5, -1.0, 2.0], 0.25, 3).unwrap();
        let output = model.infer(&[2.0, 1.0, 0.5]).unwrap();
        assert_eq!(output, RawOutput::Regression(1.25));
    }

    #[test]
    fn rejects_shape_mismatch_at_construction() {
        let err = LinearRegressor::new(vec![1.0; 3], 0.0, 19).unwrap_err();
        assert_eq!(
            err,
            InvalidModel::CoefficientCount {
                expected: 19,
                found: 3
            }
        );
    }

    #[test]
    fn rejects_wrong_input_length() {
        let model = LinearRegressor::new(vec![1.0; 2], 0.0, 2).unwrap();
        assert_eq!(
            model.infer(&[1.0]),
            Err(InferenceError::InputLength {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn overflowing_output_is_an_error() {
        let model = LinearRegressor::new(vec![f64::MAX], 0.0, 1).unwrap();
        assert_eq!(model.infer(&[10.0]), Err(InferenceError::NonFinite));
    }
}
