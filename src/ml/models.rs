//! Regressor implementations
//!
//! Both operate on already standardized inputs and return a standardized
//! output; the scalers live in [`super::scaler`].

use super::ModelError;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Trait for load regressors
pub trait Regressor: Send + Sync + std::fmt::Debug {
    /// Predict one standardized value from one standardized input row
    fn predict(&self, x: &Array1<f64>) -> Result<f64, ModelError>;

    /// Names of the inputs the model was fitted on, in column order
    fn input_features(&self) -> &[String];

    fn kind(&self) -> &'static str;

    fn input_dim(&self) -> usize {
        self.input_features().len()
    }
}

/// Linear model `x · w + b`
#[derive(Debug, Clone)]
pub struct LinearRegressionModel {
    input_features: Vec<String>,
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearRegressionModel {
    pub fn new(input_features: Vec<String>, coefficients: Vec<f64>, intercept: f64) -> Result<Self, ModelError> {
        if coefficients.len() != input_features.len() {
            return Err(ModelError::Schema(format!(
                "linear model has {} coefficients for {} input features",
                coefficients.len(),
                input_features.len()
            )));
        }
        Ok(Self {
            input_features,
            coefficients: Array1::from(coefficients),
            intercept,
        })
    }
}

impl Regressor for LinearRegressionModel {
    fn predict(&self, x: &Array1<f64>) -> Result<f64, ModelError> {
        if x.len() != self.coefficients.len() {
            return Err(ModelError::Dimension {
                expected: self.coefficients.len(),
                actual: x.len(),
            });
        }
        Ok(x.dot(&self.coefficients) + self.intercept)
    }

    fn input_features(&self) -> &[String] {
        &self.input_features
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Identity,
}

impl Activation {
    fn apply(self, z: Array1<f64>) -> Array1<f64> {
        match self {
            Activation::Relu => z.mapv_into(|v| v.max(0.0)),
            Activation::Identity => z,
        }
    }
}

/// Fully connected layer, weights shaped `(inputs, outputs)`
#[derive(Debug, Clone)]
pub struct DenseLayer {
    weights: Array2<f64>,
    bias: Array1<f64>,
    activation: Activation,
}

impl DenseLayer {
    pub fn inputs(&self) -> usize {
        self.weights.nrows()
    }

    pub fn outputs(&self) -> usize {
        self.weights.ncols()
    }

    fn forward(&self, a: &Array1<f64>) -> Array1<f64> {
        self.activation.apply(a.dot(&self.weights) + &self.bias)
    }
}

/// Multi-layer perceptron regressor (ReLU hidden layers, identity output)
#[derive(Debug, Clone)]
pub struct MlpRegressor {
    input_features: Vec<String>,
    layers: Vec<DenseLayer>,
}

impl MlpRegressor {
    pub fn new(input_features: Vec<String>, layers: Vec<DenseLayer>) -> Result<Self, ModelError> {
        let first = layers
            .first()
            .ok_or_else(|| ModelError::Schema("MLP has no layers".to_string()))?;
        if first.inputs() != input_features.len() {
            return Err(ModelError::Schema(format!(
                "first layer takes {} inputs but {} input features are declared",
                first.inputs(),
                input_features.len()
            )));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].outputs() != pair[1].inputs() {
                return Err(ModelError::Schema(format!(
                    "layer {} outputs {} values but layer {} takes {}",
                    i,
                    pair[0].outputs(),
                    i + 1,
                    pair[1].inputs()
                )));
            }
        }
        let last = &layers[layers.len() - 1];
        if last.outputs() != 1 {
            return Err(ModelError::Schema(format!(
                "output layer yields {} values, expected 1",
                last.outputs()
            )));
        }
        Ok(Self {
            input_features,
            layers,
        })
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}

impl Regressor for MlpRegressor {
    fn predict(&self, x: &Array1<f64>) -> Result<f64, ModelError> {
        if x.len() != self.input_dim() {
            return Err(ModelError::Dimension {
                expected: self.input_dim(),
                actual: x.len(),
            });
        }
        let out = self
            .layers
            .iter()
            .fold(x.clone(), |a, layer| layer.forward(&a));
        Ok(out[0])
    }

    fn input_features(&self) -> &[String] {
        &self.input_features
    }

    fn kind(&self) -> &'static str {
        "mlp"
    }
}

/// On-disk form of a dense layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerArtifact {
    /// One row per layer input
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

impl TryFrom<LayerArtifact> for DenseLayer {
    type Error = ModelError;

    fn try_from(artifact: LayerArtifact) -> Result<Self, Self::Error> {
        let rows = artifact.weights.len();
        let cols = artifact.weights.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(ModelError::Schema("layer weights are empty".to_string()));
        }
        if artifact.weights.iter().any(|row| row.len() != cols) {
            return Err(ModelError::Schema("layer weights are not rectangular".to_string()));
        }
        if artifact.bias.len() != cols {
            return Err(ModelError::Schema(format!(
                "layer has {} outputs but {} bias terms",
                cols,
                artifact.bias.len()
            )));
        }
        let flat: Vec<f64> = artifact.weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|e| ModelError::Schema(format!("layer weights: {e}")))?;
        Ok(Self {
            weights,
            bias: Array1::from(artifact.bias),
            activation: artifact.activation,
        })
    }
}

/// On-disk form of the regressor, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorArtifact {
    Linear {
        input_features: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    },
    Mlp {
        input_features: Vec<String>,
        layers: Vec<LayerArtifact>,
    },
}

impl RegressorArtifact {
    pub fn build(self) -> Result<Box<dyn Regressor>, ModelError> {
        match self {
            RegressorArtifact::Linear {
                input_features,
                coefficients,
                intercept,
            } => Ok(Box::new(LinearRegressionModel::new(
                input_features,
                coefficients,
                intercept,
            )?)),
            RegressorArtifact::Mlp {
                input_features,
                layers,
            } => {
                let layers = layers
                    .into_iter()
                    .map(DenseLayer::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Box::new(MlpRegressor::new(input_features, layers)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i}")).collect()
    }

    fn layer(weights: Vec<Vec<f64>>, bias: Vec<f64>, activation: Activation) -> DenseLayer {
        DenseLayer::try_from(LayerArtifact {
            weights,
            bias,
            activation,
        })
        .unwrap()
    }

    #[test]
    fn test_linear_regression_predict() {
        let model = LinearRegressionModel::new(names(3), vec![2.0, 3.0, 1.0], 5.0).unwrap();
        // 2*1 + 3*2 + 1*3 + 5
        assert_eq!(model.predict(&array![1.0, 2.0, 3.0]).unwrap(), 16.0);
        assert_eq!(model.kind(), "linear");
    }

    #[test]
    fn test_linear_rejects_wrong_width() {
        let model = LinearRegressionModel::new(names(2), vec![1.0, 1.0], 0.0).unwrap();
        assert_eq!(
            model.predict(&array![1.0]),
            Err(ModelError::Dimension { expected: 2, actual: 1 })
        );
        assert!(LinearRegressionModel::new(names(3), vec![1.0], 0.0).is_err());
    }

    #[test]
    fn test_mlp_forward_pass() {
        // hidden: relu([x0 - x1, x1 - x0]), output: h0 + 2*h1 + 0.5
        let mlp = MlpRegressor::new(
            names(2),
            vec![
                layer(vec![vec![1.0, -1.0], vec![-1.0, 1.0]], vec![0.0, 0.0], Activation::Relu),
                layer(vec![vec![1.0], vec![2.0]], vec![0.5], Activation::Identity),
            ],
        )
        .unwrap();

        assert_eq!(mlp.predict(&array![3.0, 1.0]).unwrap(), 2.5);
        assert_eq!(mlp.predict(&array![1.0, 3.0]).unwrap(), 4.5);
        assert_eq!(mlp.depth(), 2);
    }

    #[test]
    fn test_mlp_rejects_unchained_layers() {
        let err = MlpRegressor::new(
            names(2),
            vec![
                layer(vec![vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]], vec![0.0; 3], Activation::Relu),
                layer(vec![vec![1.0], vec![1.0]], vec![0.0], Activation::Identity),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Schema(_)));
    }

    #[test]
    fn test_mlp_requires_single_output() {
        let err = MlpRegressor::new(
            names(1),
            vec![layer(vec![vec![1.0, 1.0]], vec![0.0, 0.0], Activation::Identity)],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Schema(_)));
    }

    #[test]
    fn test_layer_artifact_must_be_rectangular() {
        let result = DenseLayer::try_from(LayerArtifact {
            weights: vec![vec![1.0, 2.0], vec![3.0]],
            bias: vec![0.0, 0.0],
            activation: Activation::Relu,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_artifact_builds_tagged_kind() {
        let json = r#"{
            "kind": "mlp",
            "input_features": ["a", "b"],
            "layers": [
                {"weights": [[1.0], [1.0]], "bias": [0.0], "activation": "identity"}
            ]
        }"#;
        let artifact: RegressorArtifact = serde_json::from_str(json).unwrap();
        let model = artifact.build().unwrap();
        assert_eq!(model.kind(), "mlp");
        assert_eq!(model.input_dim(), 2);
        assert_eq!(model.predict(&array![0.25, 0.5]).unwrap(), 0.75);
    }
}
