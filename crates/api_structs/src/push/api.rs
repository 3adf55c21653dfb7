use serde::{Deserialize, Serialize};

pub mod authorize_push_channel {
    use super::*;

    /// Form sent by the push client library when subscribing to a private channel
    #[derive(Serialize, Deserialize)]
    pub struct RequestBody {
        pub socket_id: String,
        pub channel_name: String,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct APIResponse {
        pub auth: String,
    }
}
