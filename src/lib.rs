//! Single-window editor for the GMP ancillary materials workbook: upload an
//! `.xlsx`, pick a sheet and an item, edit its fields and export the result.

pub mod app;
pub mod config;

pub mod domain {
    pub mod entities {
        pub mod edit;
        pub mod session;
        pub mod workbook;
    }
}

pub mod usecase {
    pub mod ports {
        pub mod workbook_codec;
    }
    pub mod services {
        pub mod edit_service;
        pub mod export_service;
        pub mod load_service;
        pub mod selection_service;
        pub mod session_service;
    }
}

pub mod infra {
    pub mod xlsx {
        pub mod codec;
        pub mod reader;
        pub mod writer;
    }
}

pub mod platform {
    pub mod desktop {
        pub mod blocking;
    }
}

pub mod ui {
    pub mod components;
    pub mod state {
        pub mod app_state;
    }
}

#[cfg(test)]
mod tests;
