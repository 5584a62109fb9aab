use cucumber::World;
use std::path::PathBuf;

#[derive(Debug, Default, World, Clone)]
pub struct CoreWorld {
    pub files: Vec<stepscout_core::step_catalog::SourceFile>,
    pub catalog: Option<stepscout_core::step_catalog::Catalog>,
    pub candidates: Vec<stepscout_core::matching::MatchCandidate>,
}

mod steps;

#[tokio::main]
async fn main() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let features = match std::env::var("STEPSCOUT_BDD_FEATURE_PATH").ok() {
        Some(p) => {
            let pb = PathBuf::from(p);
            if pb.is_absolute() { pb } else { root.join(pb) }
        }
        None => root.join("features"),
    };
    CoreWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit(features)
        .await;
}
