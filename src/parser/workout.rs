//! Groups the raw page fragments into exercises and their detail lines.

/// Footnote marker; any fragment carrying it is dropped during cleanup.
const IGNORE_MARKER: char = '*';

#[derive(Debug, Clone)]
pub struct Exercise {
    pub name: String,
    /// Rep range plus any notes (grip, tempo, attachment). The rep range is
    /// usually first but may appear anywhere; the sheet writer re-homes it.
    pub details: Vec<String>,
}

/// One day's workout in page order. Duplicate exercise names within a run are
/// uniqued with " #2", " #3", ... so each block keeps its own slot.
#[derive(Debug, Clone, Default)]
pub struct Workout {
    entries: Vec<Exercise>,
}

impl Workout {
    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Exercise> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn insert(&mut self, name: String, details: Vec<String>) {
        let name = self.unique_name(name);
        self.entries.push(Exercise { name, details });
    }

    fn unique_name(&self, name: String) -> String {
        if !self.contains(&name) {
            return name;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{} #{}", name, n);
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Extract a [`Workout`] from the ordered page fragments.
///
/// The first fragment after a boundary is the exercise name, everything up to
/// the next boundary belongs to its detail list. A name committed with no
/// details is kept; the sheet writer's validation pass is what surfaces it.
pub fn extract(fragments: &[String]) -> Workout {
    let mut workout = Workout::default();
    let mut name: Option<String> = None;
    let mut details: Vec<String> = Vec::new();

    for frag in clean(fragments) {
        if frag.is_empty() {
            if let Some(name) = name.take() {
                workout.insert(name, std::mem::take(&mut details));
            }
            continue;
        }
        // Stray whitespace-only text nodes carry no content
        if frag.trim().is_empty() {
            continue;
        }
        match name {
            None => name = Some(frag),
            Some(_) => details.push(frag),
        }
    }

    workout
}

/// Noise-removal pass. Drops marked fragments, collapses each run of two or
/// more empty fragments into a single boundary marker ("") and discards lone
/// empties (line breaks within an exercise). A trailing boundary is always
/// appended so the final exercise commits.
fn clean(fragments: &[String]) -> Vec<String> {
    let mut cleaned = Vec::with_capacity(fragments.len());
    let mut i = 0;

    while i < fragments.len() {
        let frag = &fragments[i];
        if frag.is_empty() {
            let mut run = 1;
            while i + run < fragments.len() && fragments[i + run].is_empty() {
                run += 1;
            }
            if run >= 2 {
                cleaned.push(String::new());
            }
            i += run;
            continue;
        }
        if !frag.contains(IGNORE_MARKER) {
            cleaned.push(frag.clone());
        }
        i += 1;
    }

    cleaned.push(String::new());
    cleaned
}
