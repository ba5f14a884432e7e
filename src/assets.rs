use std::path::{Path, PathBuf};

pub fn resolve_assets_root(cli: Option<PathBuf>) -> PathBuf {
    // Precedence: CLI flag -> TESSERA_ASSETS env -> search nearby dirs -> CWD
    if let Some(pb) = cli {
        if pb.exists() {
            return pb;
        }
        log::warn!("assets root {:?} does not exist; searching instead", pb);
    }
    if let Ok(p) = std::env::var("TESSERA_ASSETS") {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return pb;
        }
    }
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.to_path_buf());
        }
    }
    candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));

    for base in candidates {
        let mut cur = base;
        for _ in 0..5 {
            if blocks_path(&cur).exists() {
                return cur;
            }
            match cur.parent() {
                Some(parent) => cur = parent.to_path_buf(),
                None => break,
            }
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn blocks_path(root: &Path) -> PathBuf {
    root.join("assets/blocks.toml")
}

pub fn sim_config_path(root: &Path) -> PathBuf {
    root.join("assets/sim.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_wins_when_present() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        assert_eq!(resolve_assets_root(Some(root.clone())), root);
    }

    #[test]
    fn search_finds_manifest_assets() {
        let root = resolve_assets_root(Some(PathBuf::from("/definitely/not/here")));
        assert!(blocks_path(&root).exists());
    }
}
