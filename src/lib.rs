pub mod config;
pub mod domain;

pub mod application {
    pub mod drafts;
    pub mod ingestion;
}

pub mod infrastructure {
    pub mod reference_data;
    pub mod repositories {
        pub mod in_memory_draft_repository;
    }
    pub mod security;
    pub mod spreadsheet;
}

pub mod presentation {
    pub mod http {
        pub mod errors;
        pub mod routes;
        pub mod state;
        pub mod handlers {
            pub mod blueprint;
            pub mod drafts;
            pub mod health;
            pub mod reference;
            pub mod zones;
        }
        pub mod middleware {
            pub mod logging;
            pub mod request_id;
        }
    }
}
