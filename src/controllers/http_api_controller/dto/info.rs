use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [&'static str],
}

impl InfoResponse {
    pub(crate) fn new(version: &'static str, endpoints: &'static [&'static str]) -> Self {
        Self {
            name: "tokenops",
            version,
            endpoints,
        }
    }
}
