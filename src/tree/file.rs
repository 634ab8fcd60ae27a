use super::*;
use crate::Result;
use crate::table::GameParams;
use anyhow::Context;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

impl Root {
    /// Reads and fully decodes a persisted tree.
    pub fn load(path: impl AsRef<Path>) -> Result<Link> {
        let bytes = std::fs::read(path)?;
        let tree = Node::decode(&bytes, Parent::new())?;
        check_kind(Kind::Root, tree.kind())?;
        Ok(tree)
    }
    /// Reads only the root of a persisted tree. Everything below it stays
    /// in `stream` behind References that share it.
    pub fn open<S: Stream + 'static>(stream: S) -> Result<Link> {
        let source: Source = Arc::new(Mutex::new(stream));
        let mut stream = source.lock().unwrap_or_else(PoisonError::into_inner);
        let tree = Node::read_from(&mut Lazy::new(&mut *stream, &source), Parent::new())?;
        check_kind(Kind::Root, tree.kind())?;
        Ok(tree)
    }
    pub fn open_file(path: impl AsRef<Path>) -> Result<Link> {
        Self::open(BufReader::new(File::open(path)?))
    }
}

/// Streams `tree` to a new file at `path`.
pub fn save(tree: &Link, path: impl AsRef<Path>) -> Result<()> {
    let root = tree.root()?;
    let mut file = BufWriter::new(File::create(path.as_ref())?);
    tree.write(&mut file)?;
    file.flush()?;
    log::info!("saved tree {} to {}", root.id(), path.as_ref().display());
    Ok(())
}

/// A lazily opened tree and the file behind it.
#[derive(Debug, Clone)]
pub struct FileRoot {
    pub path: PathBuf,
    pub root: Link,
}

impl FileRoot {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let root = Root::open_file(&path)?;
        Ok(Self { path, root })
    }
    /// The same tree on an independent file handle, so that expansions
    /// through it never wait on this one.
    pub fn reopen(&self) -> Result<Link> {
        Root::open_file(&self.path)
    }
}

/// Every tree file found under a directory.
#[derive(Debug, Clone, Default)]
pub struct FileRoots(Vec<FileRoot>);

impl FileRoots {
    /// Recursively opens `tree*.bin` files under `dir`, in path order.
    pub fn from_dir(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let mut paths = Vec::new();
        let mut dirs = vec![dir.as_ref().to_path_buf()];
        while let Some(dir) = dirs.pop() {
            for entry in std::fs::read_dir(&dir).with_context(|| format!("reading {}", dir.display()))? {
                let path = entry?.path();
                match path.is_dir() {
                    true => dirs.push(path),
                    false if Self::is_tree(&path) => paths.push(path),
                    false => continue,
                }
            }
        }
        paths.sort();
        let roots = paths
            .into_iter()
            .map(|path| FileRoot::open(&path).with_context(|| format!("opening {}", path.display())))
            .collect::<anyhow::Result<Vec<_>>>()?;
        log::info!("found {} trees under {}", roots.len(), dir.as_ref().display());
        Ok(Self(roots))
    }
    fn is_tree(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(crate::TREE_FILE_PREFIX) && name.ends_with(crate::TREE_FILE_SUFFIX))
    }
    pub fn roots(&self) -> Vec<Link> {
        self.0.iter().map(|f| f.root.clone()).collect()
    }
    pub fn iter(&self) -> impl Iterator<Item = &FileRoot> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// File whose tree is nearest `params` for `seat`; see [`closest`].
    pub fn closest(&self, params: &GameParams, seat: u8) -> Option<&FileRoot> {
        let roots = self.roots();
        let best = closest(&roots, params, seat)?;
        self.0.iter().find(|f| Arc::ptr_eq(&f.root, &best))
    }
}

impl std::fmt::Display for FileRoots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for file in self.0.iter() {
            match file.root.as_root() {
                Some(root) => writeln!(
                    f,
                    "{} {} players {} stacks {:?}",
                    file.path.display(),
                    root.id(),
                    root.params().players,
                    root.params().stacks
                )?,
                None => writeln!(f, "{}", file.path.display())?,
            }
        }
        Ok(())
    }
}

/// Root with as many seats as `params` whose effective stack for `seat`,
/// measured in small blinds, is nearest the one `params` describes.
pub fn closest(roots: &[Link], params: &GameParams, seat: u8) -> Option<Link> {
    let depth = |p: &GameParams| p.effective_stack(seat) / p.small_blind;
    let target = depth(params);
    roots
        .iter()
        .filter_map(|link| link.as_root().map(|root| (link, root)))
        .filter(|(_, root)| root.params().players == params.players)
        .min_by(|(_, a), (_, b)| {
            let a = (depth(a.params()) - target).abs();
            let b = (depth(b.params()) - target).abs();
            a.total_cmp(&b)
        })
        .map(|(link, _)| link.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::table::Discrete;
    use crate::table::Holdem;
    use crate::tree::expand::tests::fixture;
    use std::io::Cursor;
    use std::io::Read;
    use std::io::Seek;
    use std::io::SeekFrom;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    /// In-memory stream that counts its seeks.
    struct Counted {
        inner: Cursor<Vec<u8>>,
        seeks: Arc<AtomicUsize>,
    }

    impl Read for Counted {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Seek for Counted {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            if !matches!(pos, SeekFrom::Current(0)) {
                self.seeks.fetch_add(1, Ordering::SeqCst);
            }
            self.inner.seek(pos)
        }
    }

    fn learned() -> Link {
        let tree = fixture();
        expand_full(&tree, &Holdem).unwrap();
        let opener = decision_point(&tree).unwrap();
        opener
            .as_player()
            .unwrap()
            .with(tree.root().unwrap(), 11, |p| p.summed = vec![1., 2., 3.])
            .unwrap();
        tree.root().unwrap().advance();
        tree
    }

    fn opened(bytes: Vec<u8>) -> (Link, Arc<AtomicUsize>) {
        let seeks = Arc::new(AtomicUsize::new(0));
        let stream = Counted {
            inner: Cursor::new(bytes),
            seeks: seeks.clone(),
        };
        (Root::open(stream).unwrap(), seeks)
    }

    #[test]
    fn streaming_write_matches_encode() {
        let tree = learned();
        let encoded = tree.encode().unwrap();
        let mut written = Vec::new();
        tree.write(&mut written).unwrap();
        assert_eq!(written, encoded);
        assert_eq!(encoded.len() as u64, tree.size());
        assert_eq!(encoded[0], u8::from(Kind::Root));
        let mut delimited = Vec::new();
        tree.write_delimited(&mut delimited).unwrap();
        assert_eq!(&delimited[..8], &tree.size().to_le_bytes());
        assert_eq!(&delimited[8..], &encoded[..]);
    }

    #[test]
    fn full_decode_round_trips() {
        let tree = learned();
        let bytes = tree.encode().unwrap();
        let back = Node::decode(&bytes, Parent::new()).unwrap();
        assert_eq!(back.encode().unwrap(), bytes);
        let root = back.root().unwrap();
        assert_eq!(root.id(), tree.root().unwrap().id());
        assert_eq!(root.iteration(), 1);
        assert_eq!(root.states(), 1);
        assert_eq!(root.nodes(), 14);
        assert_eq!(root.params(), tree.root().unwrap().params());
        assert_eq!(count_nodes(&back).unwrap(), 15);
        assert_eq!(count_states(&back).unwrap(), 1);
        let opener = decision_point(&back).unwrap();
        assert!(Arc::ptr_eq(&opener.parent().unwrap().parent().unwrap(), &back));
    }

    #[test]
    fn lazy_open_matches_full_decode() {
        let tree = learned();
        let bytes = tree.encode().unwrap();
        let (lazy, _) = opened(bytes.clone());
        let next = lazy.root().unwrap().next().unwrap();
        assert_eq!(next.kind(), Kind::Chance);
        let reference = next.as_reference().unwrap();
        assert!(!reference.is_expanded());
        assert_eq!(reference.size(), reference.length());
        assert!(Arc::ptr_eq(&reference.parent().unwrap(), &lazy));
        assert_eq!(lazy.size(), tree.size());
        assert_eq!(lazy.encode().unwrap(), bytes);
        assert!(reference.is_expanded());
        let chance = reference.expand().unwrap();
        assert!(Arc::ptr_eq(&chance.parent().unwrap(), &lazy));
        assert!(matches!(reference.decode(&bytes), Err(Error::Precondition(_))));
    }

    #[test]
    fn lazy_paths_match() {
        let tree = learned();
        let (lazy, _) = opened(tree.encode().unwrap());
        let mut eager = leaf_paths(&tree).unwrap().iter().map(|p| p.to_string()).collect::<Vec<_>>();
        let mut lazy = leaf_paths(&lazy).unwrap().iter().map(|p| p.to_string()).collect::<Vec<_>>();
        eager.sort();
        lazy.sort();
        assert_eq!(eager, lazy);
    }

    #[test]
    fn concurrent_expansion_decodes_once() {
        let bytes = learned().encode().unwrap();
        let (single, seeks) = opened(bytes.clone());
        let before = seeks.load(Ordering::SeqCst);
        single.root().unwrap().next().unwrap().resolve().unwrap();
        let once = seeks.load(Ordering::SeqCst) - before;
        assert!(once > 0);

        let (shared, seeks) = opened(bytes);
        let before = seeks.load(Ordering::SeqCst);
        let next = shared.root().unwrap().next().unwrap();
        let nodes = std::thread::scope(|scope| {
            let handles = (0..8)
                .map(|_| scope.spawn(|| next.resolve().unwrap()))
                .collect::<Vec<_>>();
            handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
        });
        assert!(nodes.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(seeks.load(Ordering::SeqCst) - before, once);
    }

    #[test]
    fn expansion_restores_stream_position() {
        let bytes = learned().encode().unwrap();
        let (lazy, _) = opened(bytes.clone());
        let next = lazy.root().unwrap().next().unwrap();
        let reference = next.as_reference().unwrap();
        assert_eq!(reference.offset() + reference.length(), bytes.len() as u64);
        let chance = reference.expand().unwrap();
        let player = decision_point(&chance).unwrap();
        let shove = player.as_player().unwrap().child(Discrete::ALL_IN).unwrap();
        assert_eq!(shove.kind(), Kind::Player);
        assert!(shove.as_reference().is_some());
        let shove = shove.resolve().unwrap();
        assert_eq!(shove.as_player().unwrap().actions(), vec![Discrete::FOLD, Discrete::CALL]);
        assert_eq!(lazy.encode().unwrap(), bytes);
    }

    #[test]
    fn cleared_references_are_read_again() {
        let tree = learned();
        let bytes = tree.encode().unwrap();
        let (lazy, _) = opened(bytes.clone());
        expand_full(&lazy, &Holdem).unwrap();
        assert_eq!(count_nodes(&lazy).unwrap(), count_nodes(&tree).unwrap() + 14);
        assert_eq!(discard_reference_at_depth(&lazy, None), 0);
        assert_eq!(discard_reference_at_depth(&lazy, Some(1)), 1);
        let next = lazy.root().unwrap().next().unwrap();
        let chance = next.as_reference().unwrap().cached().unwrap();
        let player = chance.as_chance().unwrap().next().unwrap();
        assert!(!player.as_reference().unwrap().is_expanded());
        assert_eq!(discard_reference_at_depth(&lazy, Some(0)), 1);
        assert!(!next.as_reference().unwrap().is_expanded());
        let again = next.resolve().unwrap();
        assert!(!Arc::ptr_eq(&again, &chance));
        assert_eq!(lazy.encode().unwrap(), bytes);
    }

    #[test]
    fn files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let tree = learned();
        let path = dir.path().join("tree_fixture.bin");
        save(&tree, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, tree.encode().unwrap());
        let loaded = Root::load(&path).unwrap();
        assert_eq!(loaded.encode().unwrap(), bytes);
        let opened = Root::open_file(&path).unwrap();
        assert_eq!(opened.encode().unwrap(), bytes);
    }

    #[test]
    fn truncated_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree_short.bin");
        let bytes = learned().encode().unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();
        assert!(Root::load(&path).unwrap_err().is_truncated());
        let lazy = Root::open_file(&path).unwrap();
        assert!(lazy.encode().unwrap_err().is_truncated());
    }

    #[test]
    fn non_root_files_are_rejected() {
        let node = Node::Chance(Chance::new(Parent::new(), None));
        let bytes = node.encode().unwrap();
        assert!(matches!(
            Root::open(Cursor::new(bytes)),
            Err(Error::KindMismatch { expected: Kind::Root, found: Kind::Chance })
        ));
    }

    #[test]
    fn directories_are_searched() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep");
        std::fs::create_dir(&nested).unwrap();
        for (stack, path) in [(100., dir.path().join("tree_a.bin")), (40., nested.join("tree_b.bin"))] {
            let config = FullTree {
                big_blind: stack,
                players: 2,
                betting: vec![],
                max_actions: 2,
                terminal: crate::table::Street::Flop,
                min_bet: false,
                limp: true,
            };
            save(&config.build(&Holdem).unwrap(), path).unwrap();
        }
        std::fs::write(dir.path().join("notes.bin"), b"ignored").unwrap();
        std::fs::write(dir.path().join("tree_c.txt"), b"ignored").unwrap();
        let roots = FileRoots::from_dir(dir.path()).unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots.to_string().lines().count(), 2);
        let shallow = GameParams {
            small_blind: 0.5,
            stacks: vec![25., 25.],
            ..GameParams::heads_up(25.)
        };
        let found = roots.closest(&shallow, 0).unwrap();
        assert!(found.path.ends_with("deep/tree_b.bin"));
        let reopened = found.reopen().unwrap();
        assert_eq!(reopened.root().unwrap().id(), found.root.root().unwrap().id());
        assert!(closest(&roots.roots(), &GameParams { players: 3, ..shallow }, 0).is_none());
    }

    #[test]
    fn missing_directories_carry_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileRoots::from_dir(dir.path().join("absent")).unwrap_err();
        assert!(err.to_string().contains("absent"));
    }
}
