use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use cereal_calories::application::ml::artifact::{ForestModel, LinearModel};
use cereal_calories::application::ml::{
    CaloriePredictor, ModelArtifact, Regressor, SmartCorePredictor,
};
use cereal_calories::application::prediction::PredictionService;
use cereal_calories::domain::errors::{ApiError, ModelLoadError};
use cereal_calories::infrastructure::observability::Metrics;
use cereal_calories::interfaces::http;
use serde_json::{Value, json};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters};
use std::path::PathBuf;
use std::sync::Arc;

struct TempArtifact(PathBuf);

impl TempArtifact {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("cereal-model-{}.json", uuid::Uuid::new_v4())))
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        std::fs::remove_file(&self.0).ok();
    }
}

// calories = 18 + 4*protein + 9*fat + 4*sugars
fn fit_linear() -> LinearModel {
    let rows = vec![
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
        vec![2.0, 2.0, 6.0],
        vec![4.0, 1.0, 12.0],
        vec![3.0, 3.0, 3.0],
    ];
    let y: Vec<f64> = rows
        .iter()
        .map(|r| 18.0 + 4.0 * r[0] + 9.0 * r[1] + 4.0 * r[2])
        .collect();
    let x = DenseMatrix::from_2d_vec(&rows).unwrap();
    LinearRegression::fit(&x, &y, LinearRegressionParameters::default()).unwrap()
}

#[::core::prelude::v1::test]
fn test_load_failure_surfaces_cause() {
    let path = TempArtifact::new();
    std::fs::write(&path.0, "{\"feature_names\": [\"protein\"]}").unwrap();

    let err = SmartCorePredictor::load(&path.0).err().expect("must fail");
    assert!(matches!(err, ModelLoadError::Decode { .. }));
    assert!(err.to_string().contains("regressor"));
}

#[actix_web::test]
async fn test_saved_model_serves_predictions() {
    let path = TempArtifact::new();
    ModelArtifact::new(Regressor::LinearRegression(fit_linear()))
        .with_version("integration")
        .save(&path.0)
        .unwrap();

    let predictor = SmartCorePredictor::load(&path.0).unwrap();
    assert_eq!(predictor.version(), "integration");

    let data = web::Data::new(PredictionService::new(
        Arc::new(predictor),
        Metrics::new().unwrap(),
        true,
    ));
    let app = test::init_service(
        App::new()
            .wrap(http::cors())
            .app_data(data)
            .configure(http::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/cereal")
        .set_payload(r#"{"protein":3,"fat":1,"sugars":9}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 18 + 12 + 9 + 36
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"status": true, "calories": 75.0, "currency": "cal"})
    );
}

// calories = 10 + 2*protein + 9*fat + 4*sugars + 3*fiber
fn fit_linear_with_fiber() -> LinearModel {
    let rows = vec![
        vec![1.0, 0.0, 0.0, 2.0],
        vec![0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 1.0],
        vec![1.0, 1.0, 1.0, 3.0],
        vec![2.0, 1.0, 3.0, 0.0],
        vec![3.0, 2.0, 1.0, 5.0],
    ];
    let y: Vec<f64> = rows
        .iter()
        .map(|r| 10.0 + 2.0 * r[0] + 9.0 * r[1] + 4.0 * r[2] + 3.0 * r[3])
        .collect();
    let x = DenseMatrix::from_2d_vec(&rows).unwrap();
    LinearRegression::fit(&x, &y, LinearRegressionParameters::default()).unwrap()
}

// Every split reads the fourth column
fn fit_forest_on_fiber() -> ForestModel {
    let rows: Vec<Vec<f64>> = (0..8).map(|i| vec![0.0, 0.0, 0.0, i as f64]).collect();
    let y: Vec<f64> = rows.iter().map(|r| 50.0 + 10.0 * r[3]).collect();
    let x = DenseMatrix::from_2d_vec(&rows).unwrap();
    let params = RandomForestRegressorParameters::default()
        .with_n_trees(5)
        .with_m(4);
    ForestModel::fit(&x, &y, params).unwrap()
}

fn serve(
    predictor: SmartCorePredictor,
    expose_internal_errors: bool,
) -> web::Data<PredictionService> {
    web::Data::new(PredictionService::new(
        Arc::new(predictor),
        Metrics::new().unwrap(),
        expose_internal_errors,
    ))
}

#[::core::prelude::v1::test]
fn test_wider_model_under_default_names_rejected_at_load() {
    let path = TempArtifact::new();
    ModelArtifact::new(Regressor::LinearRegression(fit_linear_with_fiber()))
        .save(&path.0)
        .unwrap();

    let err = SmartCorePredictor::load(&path.0).err().expect("must fail");
    assert!(matches!(
        err,
        ModelLoadError::WidthMismatch {
            declared: 3,
            fitted: 4
        }
    ));
}

#[::core::prelude::v1::test]
fn test_forest_width_recorded_on_save_is_checked() {
    let path = TempArtifact::new();
    ModelArtifact::new(Regressor::RandomForest(fit_forest_on_fiber()))
        .with_fitted_width(4)
        .save(&path.0)
        .unwrap();

    let err = SmartCorePredictor::load(&path.0).err().expect("must fail");
    assert!(matches!(err, ModelLoadError::WidthMismatch { fitted: 4, .. }));
}

#[actix_web::test]
async fn test_model_with_other_feature_count_fails_per_request() {
    let path = TempArtifact::new();
    let mut artifact = ModelArtifact::new(Regressor::LinearRegression(fit_linear_with_fiber()));
    artifact.feature_names.push("fiber".to_string());
    artifact.save(&path.0).unwrap();

    // Names and regressor agree, so loading succeeds; requests carry three columns
    let predictor = SmartCorePredictor::load(&path.0).unwrap();

    let app = test::init_service(
        App::new()
            .app_data(serve(predictor, false))
            .configure(http::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/cereal")
        .set_payload(r#"{"protein":3,"fat":1,"sugars":9}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"status": false, "error": "Internal prediction error"})
    );
}

#[::core::prelude::v1::test]
fn test_mislabelled_forest_fails_in_service() {
    let predictor = SmartCorePredictor::from_artifact(
        ModelArtifact::new(Regressor::RandomForest(fit_forest_on_fiber())),
        PathBuf::from("mislabelled.json"),
    );
    let service = PredictionService::new(Arc::new(predictor), Metrics::new().unwrap(), true);

    let err = service
        .handle(br#"{"protein":3,"fat":1,"sugars":9}"#)
        .unwrap_err();
    match err {
        ApiError::PredictionFailure { message } => assert!(message.contains("panicked")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(service.metrics().request_count("cereal", "prediction_failure"), 1);
}

#[actix_web::test]
async fn test_mislabelled_models_answer_500_json() {
    let linear = SmartCorePredictor::from_artifact(
        ModelArtifact::new(Regressor::LinearRegression(fit_linear_with_fiber())),
        PathBuf::from("mislabelled-linear.json"),
    );
    let forest = SmartCorePredictor::from_artifact(
        ModelArtifact::new(Regressor::RandomForest(fit_forest_on_fiber())),
        PathBuf::from("mislabelled-forest.json"),
    );

    let cases = [
        (
            linear,
            "X has 3 features, but the model is expecting 4 features as input",
        ),
        (forest, "regressor panicked"),
    ];
    for (predictor, expected) in cases {
        let app = test::init_service(
            App::new()
                .wrap(http::cors())
                .app_data(serve(predictor, true))
                .configure(http::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/cereal")
            .set_payload(r#"{"protein":3,"fat":1,"sugars":9}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], json!(false));
        let error = body["error"].as_str().expect("error message");
        assert!(error.contains(expected), "{}", error);
    }
}
