pub mod kata_pipeline;
