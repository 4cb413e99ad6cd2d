use super::{
    argmax_label, ensure_finite, InferenceError, InvalidModel, OutputKind, Predictor, RawOutput,
};

/// Logistic regression classifier.
///
/// With one coefficient row and two classes the binary sigmoid form is used
/// (the row scores the second class); otherwise one row per class and softmax.
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    classes: Vec<String>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    input_len: usize,
}

impl LogisticClassifier {
    pub fn new(
        classes: Vec<String>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
        input_len: usize,
    ) -> Result<Self, InvalidModel> {
        if classes.len() < 2 {
            return Err(InvalidModel::TooFewClasses {
                model: "logistic_classifier",
            });
        }

        let binary = classes.len() == 2 && coefficients.len() == 1;
        if !binary && coefficients.len() != classes.len() {
            return Err(InvalidModel::RowCount {
                rows: coefficients.len(),
                classes: classes.len(),
            });
        }
        if intercepts.len() != coefficients.len() {
            return Err(InvalidModel::InterceptCount {
                intercepts: intercepts.len(),
                rows: coefficients.len(),
            });
        }
        if let Some((row, values)) = coefficients
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != input_len)
        {
            return Err(InvalidModel::RowWidth {
                row,
                expected: input_len,
                found: values.len(),
            });
        }
        let all_finite = intercepts.iter().all(|v| v.is_finite())
            && coefficients.iter().flatten().all(|v| v.is_finite());
        if !all_finite {
            return Err(InvalidModel::NonFinite {
                model: "logistic_classifier",
            });
        }

        Ok(Self {
            classes,
            coefficients,
            intercepts,
            input_len,
        })
    }

    fn decision(&self, features: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                row.iter()
                    .zip(features)
                    .fold(*intercept, |acc, (c, x)| acc + c * x)
            })
            .collect()
    }

    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        self.check_input(features)?;
        let logits = self.decision(features);

        let probabilities = if logits.len() == 1 {
            let p = sigmoid(logits[0]);
            vec![1.0 - p, p]
        } else {
            softmax(&logits)
        };

        for p in &probabilities {
            ensure_finite(*p)?;
        }
        Ok(probabilities)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl Predictor for LogisticClassifier {
    fn name(&self) -> &'static str {
        "logistic_classifier"
    }

    fn output_kind(&self) -> OutputKind {
        OutputKind::Classification
    }

    fn input_len(&self) -> usize {
        self.input_len
    }

    fn infer(&self, features: &[f64]) -> Result<RawOutput, InferenceError> {
        let probabilities = self.predict_proba(features)?;
        let label = argmax_label(&self.classes, &probabilities);
        Ok(RawOutput::Classification {
            label,
            probabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn binary_form_uses_sigmoid_of_single_row() {
        let model =
            LogisticClassifier::new(classes(&["no", "yes"]), vec![vec![0.0, 0.0]], vec![0.0], 2)
                .unwrap();

        let proba = model.predict_proba(&[3.0, 4.0]).unwrap();
        assert_eq!(proba, vec![0.5, 0.5]);
    }

    #[test]
    fn strongly_positive_logit_picks_second_class() {
        let model =
            LogisticClassifier::new(classes(&["no", "yes"]), vec![vec![2.0]], vec![0.0], 1)
                .unwrap();

        match model.infer(&[5.0]).unwrap() {
            RawOutput::Classification {
                label,
                probabilities,
            } => {
                assert_eq!(label, "yes");
                assert!(probabilities[1] > 0.99);
                assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-12);
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn multinomial_softmax_sums_to_one() {
        let model = LogisticClassifier::new(
            classes(&["low", "mid", "high"]),
            vec![vec![1.0], vec![0.0], vec![-1.0]],
            vec![0.0, 0.5, 0.0],
            1,
        )
        .unwrap();

        let proba = model.predict_proba(&[1000.0]).unwrap();
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(proba[0] > 0.999);
    }

    #[test]
    fn rejects_row_count_mismatch() {
        let err = LogisticClassifier::new(
            classes(&["a", "b", "c"]),
            vec![vec![1.0], vec![1.0]],
            vec![0.0, 0.0],
            1,
        )
        .unwrap_err();
        assert_eq!(err, InvalidModel::RowCount { rows: 2, classes: 3 });
    }

    #[test]
    fn rejects_short_rows() {
        let err =
            LogisticClassifier::new(classes(&["a", "b"]), vec![vec![1.0]], vec![0.0], 19)
                .unwrap_err();
        assert_eq!(
            err,
            InvalidModel::RowWidth {
                row: 0,
                expected: 19,
                found: 1
            }
        );
    }
}
