pub mod request;
pub mod response;

pub use request::{PredictInstance, PredictParameters, PredictPath, PredictRequest, PredictRequestBody};
pub use response::{PredictPrediction, PredictResponse};
