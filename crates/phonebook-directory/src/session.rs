//! Background request dispatch with last-request-wins semantics.
//!
//! A `Session` owns the state an interactive front end displays: the organization tree
//! and the current list of people. Requests run on worker threads and report back over
//! a channel. Each request is stamped with a generation number; when a result arrives
//! for a slot (tree or people) that has since been requested again, it is dropped, so
//! the most recently issued request always determines what is shown.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender, TryRecvError},
    },
    thread,
};

use phonebook_tree::{DepartmentSelection, DirectoryRecord, RenderedTree};
use tracing::{debug, warn};

use crate::{
    directory::Directory,
    error::DirectoryError,
    service::{Phonebook, SearchOutcome},
};

/// Something the session can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Rebuild the organization tree from the directory.
    LoadTree,
    /// Free-text search.
    Search {
        /// Text as typed.
        text: String,
        /// Retry with transliterated text when nothing is found.
        fallback: bool,
    },
    /// List the people below a tree selection.
    Department(DepartmentSelection),
}

impl Request {
    /// Returns the display slot this request writes to.
    pub fn slot(&self) -> Slot {
        match self {
            Self::LoadTree => Slot::Tree,
            Self::Search { .. } | Self::Department(_) => Slot::People,
        }
    }
}

/// A piece of displayed state written by requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The organization tree.
    Tree,
    /// The list of people.
    People,
}

/// Identifies an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    /// Slot the request writes to.
    pub slot: Slot,
    /// Monotonic generation within the session.
    pub generation: u64,
}

/// Result payload of a finished request.
#[derive(Debug)]
enum Payload {
    /// A freshly built tree.
    Tree(RenderedTree),
    /// A text search outcome.
    Search(SearchOutcome),
    /// People below a selection.
    Department(Vec<DirectoryRecord>),
}

/// Message sent from a worker to the session.
#[derive(Debug)]
struct Completion {
    /// Which request finished.
    ticket: Ticket,
    /// What it produced.
    result: Result<Payload, DirectoryError>,
}

/// What applying a completion did to the session state.
#[derive(Debug)]
pub enum Update {
    /// The tree was replaced.
    TreeLoaded {
        /// Request that produced it.
        ticket: Ticket,
    },
    /// The list of people was replaced.
    PeopleChanged {
        /// Request that produced it.
        ticket: Ticket,
        /// Set when the list came from a text search.
        outcome: Option<SearchOutcome>,
    },
    /// The request failed; state is unchanged.
    Failed {
        /// Request that failed.
        ticket: Ticket,
        /// Why.
        error: DirectoryError,
    },
    /// A newer request for the same slot was issued before this one finished.
    Stale {
        /// Request whose result was discarded.
        ticket: Ticket,
    },
}

impl Update {
    /// Returns the ticket of the request this update belongs to.
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::TreeLoaded { ticket }
            | Self::PeopleChanged { ticket, .. }
            | Self::Failed { ticket, .. }
            | Self::Stale { ticket } => *ticket,
        }
    }
}

/// Interactive phonebook state fed by background requests.
pub struct Session<D> {
    /// Shared phonebook used by workers.
    phonebook: Arc<Phonebook<D>>,
    /// Cloned into every worker.
    sender: Sender<Completion>,
    /// Single consumer of completions.
    receiver: Receiver<Completion>,
    /// Last generation handed out.
    generation: u64,
    /// Latest issued generation for the tree slot.
    latest_tree: u64,
    /// Latest issued generation for the people slot.
    latest_people: u64,
    /// Requests issued but not yet applied.
    pending: usize,
    /// Current tree, once loaded.
    tree: Option<RenderedTree>,
    /// Current list of people.
    people: Vec<DirectoryRecord>,
}

impl<D: Directory + 'static> Session<D> {
    /// Creates a session with empty state.
    pub fn new(phonebook: Phonebook<D>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            phonebook: Arc::new(phonebook),
            sender,
            receiver,
            generation: 0,
            latest_tree: 0,
            latest_people: 0,
            pending: 0,
            tree: None,
            people: Vec::new(),
        }
    }

    /// Returns the phonebook requests run against.
    pub fn phonebook(&self) -> &Phonebook<D> {
        &self.phonebook
    }

    /// Returns the current tree, if one has been loaded.
    pub fn tree(&self) -> Option<&RenderedTree> {
        self.tree.as_ref()
    }

    /// Returns the current list of people.
    pub fn people(&self) -> &[DirectoryRecord] {
        &self.people
    }

    /// Returns the number of requests whose results have not been applied.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Issues a request on a worker thread and returns its ticket.
    pub fn submit(&mut self, request: Request) -> Ticket {
        self.generation += 1;
        let ticket = Ticket {
            slot: request.slot(),
            generation: self.generation,
        };
        match ticket.slot {
            Slot::Tree => self.latest_tree = ticket.generation,
            Slot::People => self.latest_people = ticket.generation,
        }
        self.pending += 1;
        debug!(?request, generation = ticket.generation, "request submitted");

        let phonebook = Arc::clone(&self.phonebook);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| execute(&phonebook, request)))
                .unwrap_or(Err(DirectoryError::WorkerGone));
            if sender.send(Completion { ticket, result }).is_err() {
                debug!(generation = ticket.generation, "session closed before completion");
            }
        });

        ticket
    }

    /// Applies every completion that has already arrived, without blocking.
    pub fn poll(&mut self) -> Vec<Update> {
        let mut updates = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(completion) => updates.push(self.apply(completion)),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return updates,
            }
        }
    }

    /// Blocks for the next completion and applies it.
    ///
    /// Returns `None` when no request is outstanding.
    pub fn wait(&mut self) -> Option<Update> {
        if self.pending == 0 {
            return None;
        }
        let completion = self.receiver.recv().ok()?;
        Some(self.apply(completion))
    }

    /// Issues a request and blocks until its own result has been applied.
    ///
    /// Results of other requests that arrive in the meantime are applied too.
    pub fn run(&mut self, request: Request) -> Update {
        let ticket = self.submit(request);
        while let Some(update) = self.wait() {
            if update.ticket() == ticket {
                return update;
            }
        }
        Update::Failed {
            ticket,
            error: DirectoryError::WorkerGone,
        }
    }

    /// Applies one completion, discarding it if a newer request owns its slot.
    fn apply(&mut self, completion: Completion) -> Update {
        self.pending = self.pending.saturating_sub(1);
        let Completion { ticket, result } = completion;

        let latest = match ticket.slot {
            Slot::Tree => self.latest_tree,
            Slot::People => self.latest_people,
        };
        if ticket.generation < latest {
            warn!(
                slot = ?ticket.slot,
                generation = ticket.generation,
                latest,
                "dropping stale result"
            );
            return Update::Stale { ticket };
        }

        match result {
            Ok(Payload::Tree(tree)) => {
                self.tree = Some(tree);
                Update::TreeLoaded { ticket }
            }
            Ok(Payload::Search(outcome)) => {
                self.people.clone_from(&outcome.records);
                Update::PeopleChanged {
                    ticket,
                    outcome: Some(outcome),
                }
            }
            Ok(Payload::Department(people)) => {
                self.people = people;
                Update::PeopleChanged {
                    ticket,
                    outcome: None,
                }
            }
            Err(error) => Update::Failed { ticket, error },
        }
    }
}

/// Runs a request on the calling thread.
fn execute<D: Directory>(
    phonebook: &Phonebook<D>,
    request: Request,
) -> Result<Payload, DirectoryError> {
    match request {
        Request::LoadTree => phonebook.load_rendered_tree().map(Payload::Tree),
        Request::Search { text, fallback } => phonebook
            .search_text_with(&text, fallback)
            .map(Payload::Search),
        Request::Department(selection) => phonebook
            .search_department(&selection)
            .map(Payload::Department),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Condvar, Mutex},
        time::Duration,
    };

    use phonebook_tree::Query;

    use super::*;
    use crate::memory::MemoryDirectory;

    /// A directory whose text searches block until released.
    struct Gated {
        /// Inner directory.
        inner: MemoryDirectory,
        /// Texts whose searches are held back.
        held: Mutex<Vec<String>>,
        /// Signalled when `held` changes.
        changed: Condvar,
    }

    impl Gated {
        fn release(&self, text: &str) {
            self.held.lock().unwrap().retain(|t| t != text);
            self.changed.notify_all();
        }
    }

    impl Directory for Gated {
        fn search(&self, query: &Query) -> Result<Vec<DirectoryRecord>, DirectoryError> {
            if let Query::Text(text) = query {
                let mut held = self.held.lock().unwrap();
                while held.contains(text) {
                    held = self.changed.wait(held).unwrap();
                }
            }
            self.inner.search(query)
        }

        fn describe(&self) -> String {
            String::from("gated")
        }
    }

    fn person(cn: &str) -> DirectoryRecord {
        DirectoryRecord {
            cn: cn.into(),
            organization: "Acme".into(),
            unit: "Ops".into(),
            ..DirectoryRecord::default()
        }
    }

    fn gated(held: &[&str]) -> (Arc<Gated>, Session<Arc<Gated>>) {
        let gate = Arc::new(Gated {
            inner: MemoryDirectory::new(vec![person("Ann"), person("Bob")]),
            held: Mutex::new(held.iter().map(|s| (*s).to_string()).collect()),
            changed: Condvar::new(),
        });
        let session = Session::new(Phonebook::new(Arc::clone(&gate), "Root"));
        (gate, session)
    }

    fn search(text: &str) -> Request {
        Request::Search {
            text: text.into(),
            fallback: false,
        }
    }

    #[test]
    fn test_run_loads_tree_and_people() {
        let (_, mut session) = gated(&[]);
        assert!(matches!(
            session.run(Request::LoadTree),
            Update::TreeLoaded { .. }
        ));
        assert_eq!(session.tree().unwrap().root().name, "Root");

        let update = session.run(search("ann"));
        assert!(matches!(
            update,
            Update::PeopleChanged {
                outcome: Some(_),
                ..
            }
        ));
        assert_eq!(session.people().len(), 1);
        assert_eq!(session.pending(), 0);
        assert!(session.wait().is_none());
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let (gate, mut session) = gated(&["ann"]);

        let slow = session.submit(search("ann"));
        let fast = session.submit(search("bob"));

        // The newer request finishes first and is applied.
        let update = session.wait().unwrap();
        assert_eq!(update.ticket(), fast);
        assert_eq!(session.people()[0].cn, "Bob");

        // The older one finishes afterwards and must not overwrite the list.
        gate.release("ann");
        let update = session.wait().unwrap();
        assert!(matches!(update, Update::Stale { ticket } if ticket == slow));
        assert_eq!(session.people().len(), 1);
        assert_eq!(session.people()[0].cn, "Bob");
    }

    #[test]
    fn test_slots_are_independent() {
        let (gate, mut session) = gated(&["ann"]);
        let people = session.submit(search("ann"));
        let tree = session.submit(Request::LoadTree);

        let update = session.wait().unwrap();
        assert_eq!(update.ticket(), tree);
        gate.release("ann");
        let update = session.wait().unwrap();
        assert_eq!(update.ticket(), people);
        assert!(matches!(update, Update::PeopleChanged { .. }));
    }

    #[test]
    fn test_poll_does_not_block() {
        let (gate, mut session) = gated(&["ann"]);
        session.submit(search("ann"));
        assert!(session.poll().is_empty());
        assert_eq!(session.pending(), 1);

        gate.release("ann");
        let mut updates = Vec::new();
        for _ in 0..200 {
            updates = session.poll();
            if !updates.is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(updates.len(), 1);
        assert_eq!(session.pending(), 0);
    }
}
