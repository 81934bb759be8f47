use std::{
    fs,
    path::{Path, PathBuf},
};

#[test]
fn no_debug_leftovers() {
    for path in rust_files(&project_root().join("src")) {
        let text = fs::read_to_string(&path).unwrap();
        for needle in ["dbg!(", "todo!(", "println!("] {
            if text.contains(needle) {
                panic!("`{}` left in {}", needle, path.display());
            }
        }
    }
}

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap().to_path_buf()
}

fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut res = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            res.extend(rust_files(&path));
        } else if path.extension().map_or(false, |it| it == "rs") {
            res.push(path);
        }
    }
    res
}
