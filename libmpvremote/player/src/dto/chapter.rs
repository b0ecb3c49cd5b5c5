use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Chapter {
    pub title: Option<String>,
    pub time: f64,
}
