//! Proof logging.
//!
//! When enabled, every clause the solver relies on is written to a resolution trace together
//! with the identifiers of the clauses it was derived from. Next to the trace, two files are
//! produced: the literal semantics, mapping every Boolean variable to the atomic constraint it
//! stands for, and the solution file with the last model that was found.
//!
//! A [`ProofLog`] created with [`ProofLog::default`] is inactive: every operation is a no-op and
//! identifier-returning operations return a dummy identifier. This allows the solver to call
//! into the log unconditionally.
//!
//! Writing to the proof files can fail at any point during search. The first failure is kept,
//! reported through the `log` facade, and returned by [`ProofLog::finalize`]; search is never
//! interrupted by it.
mod bindings;

use std::fmt::Debug;
use std::fmt::Formatter;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::num::NonZeroU32;
use std::path::Path;
use std::path::PathBuf;

pub(crate) use bindings::Binding;
pub(crate) use bindings::BindingTarget;
use lcg_trace::steps::ClauseId;
use lcg_trace::write_definition;
use lcg_trace::writer::TraceWriter;
use lcg_trace::Atom;
use lcg_trace::Relation;
use lcg_trace::Solution;
use lcg_trace::TRUE_CONSTANT;
use log::error;
use log::warn;
use thiserror::Error;

use crate::basic_types::BooleanVariable;
use crate::basic_types::ChannelInfo;
use crate::basic_types::ChannelKind;
use crate::basic_types::HashMap;
use crate::basic_types::Lbool;
use crate::basic_types::Literal;
use crate::basic_types::ValueKind;
use crate::engine::sat::Clause;
use crate::engine::variables::IntVarId;
use crate::lcg_assert_simple;

/// The identifier handed out when proof logging is disabled.
pub(crate) const DUMMY_CLAUSE_ID: ClauseId = NonZeroU32::MAX;

#[derive(Debug, Error)]
pub enum ProofError {
    #[error("failed to write the proof: {0}")]
    Io(#[from] io::Error),
}

/// The locations of the three proof files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofOptions {
    pub trace: PathBuf,
    pub semantics: PathBuf,
    pub solution: PathBuf,
}

impl ProofOptions {
    /// Put the semantics and the solution next to the trace, as `<trace>.lits` and
    /// `<trace>.sol`.
    pub fn from_trace_path(trace: impl Into<PathBuf>) -> ProofOptions {
        let trace = trace.into();
        let with_suffix = |suffix: &str| {
            let mut path = trace.clone().into_os_string();
            path.push(suffix);
            PathBuf::from(path)
        };

        ProofOptions {
            semantics: with_suffix(".lits"),
            solution: with_suffix(".sol"),
            trace,
        }
    }
}

/// The proof log of a solver. See the module documentation.
#[derive(Debug, Default)]
pub struct ProofLog {
    internal_proof: Option<ProofImpl>,
}

enum SolutionSink {
    /// Created only once there is a model to write.
    File(PathBuf),
    Writer(Box<dyn Write>),
}

struct ProofImpl {
    trace: TraceWriter<Box<dyn Write>>,
    semantics: BufWriter<Box<dyn Write>>,
    solution: Option<SolutionSink>,
    /// The item of the input whose clauses are currently being generated.
    active_item: u32,
    /// The antecedents of the next [`ProofLog::resolve`].
    antecedents: Vec<ClauseId>,
    /// Identifiers which are deleted after the next resolution step.
    pending_deletions: Vec<ClauseId>,
    int_var_names: HashMap<IntVarId, String>,
    bindings: Vec<Binding>,
    has_model: bool,
    error: Option<io::Error>,
}

impl Debug for ProofImpl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofImpl")
            .field("active_item", &self.active_item)
            .field("antecedents", &self.antecedents)
            .field("pending_deletions", &self.pending_deletions)
            .field("bindings", &self.bindings)
            .field("has_model", &self.has_model)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl ProofLog {
    /// Log to the files in `options`. Paths ending in `.gz` are compressed.
    pub fn to_files(options: &ProofOptions) -> Result<ProofLog, ProofError> {
        let trace = create_writer(&options.trace)?;
        let semantics = create_writer(&options.semantics)?;

        Ok(ProofLog::with_sinks(
            trace,
            semantics,
            SolutionSink::File(options.solution.clone()),
        ))
    }

    /// Log to arbitrary writers, e.g. in-memory buffers.
    pub fn to_writers(
        trace: Box<dyn Write>,
        semantics: Box<dyn Write>,
        solution: Box<dyn Write>,
    ) -> ProofLog {
        ProofLog::with_sinks(trace, semantics, SolutionSink::Writer(solution))
    }

    fn with_sinks(
        trace: Box<dyn Write>,
        semantics: Box<dyn Write>,
        solution: SolutionSink,
    ) -> ProofLog {
        let mut proof = ProofImpl {
            trace: TraceWriter::new(trace),
            semantics: BufWriter::new(semantics),
            solution: Some(solution),
            active_item: 0,
            antecedents: Vec::new(),
            pending_deletions: Vec::new(),
            int_var_names: HashMap::default(),
            bindings: vec![Binding::new(
                TRUE_CONSTANT,
                BindingTarget::Literal(Literal::positive(BooleanVariable::new(0))),
            )],
            has_model: false,
            error: None,
        };

        proof.write_constant(BooleanVariable::new(0), true);
        proof.write_constant(BooleanVariable::new(1), false);

        ProofLog {
            internal_proof: Some(proof),
        }
    }

    pub fn is_active(&self) -> bool {
        self.internal_proof.is_some()
    }

    /// The item new clauses are attributed to; `0` if there is none.
    pub fn active_item(&self) -> u32 {
        self.internal_proof
            .as_ref()
            .map_or(0, |proof| proof.active_item)
    }

    /// Attribute clauses created from now on to `item`, which is written as a hint in front of
    /// them. Item `0` clears the attribution.
    pub fn set_active_item(&mut self, item: u32) {
        if let Some(proof) = self.internal_proof.as_mut() {
            proof.active_item = item;
        }
    }

    /// Give an input clause an identifier, writing it without antecedents. Calling this again
    /// for the same clause returns the same identifier.
    pub(crate) fn intro(&mut self, clause: &mut Clause) -> ClauseId {
        let Some(proof) = self.internal_proof.as_mut() else {
            return DUMMY_CLAUSE_ID;
        };
        lcg_assert_simple!(!clause.is_temporary());

        if let Some(id) = clause.ident {
            return id;
        }

        proof.set_hint(clause.origin);
        let id = proof.write_clause(clause.literals(), &[]);
        clause.ident = Some(id);
        id
    }

    /// Give the reason clause of `literal` an identifier, writing it if it has none yet.
    ///
    /// Temporary clauses are rewritten for every explanation, so they get a fresh identifier on
    /// every call, with `literal` placed at position 0. That identifier is deleted after the
    /// next resolution step.
    pub(crate) fn infer(&mut self, literal: Literal, clause: &mut Clause) -> ClauseId {
        let Some(proof) = self.internal_proof.as_mut() else {
            return DUMMY_CLAUSE_ID;
        };

        if clause.is_temporary() {
            clause[0] = literal;
        } else if let Some(id) = clause.ident {
            lcg_assert_simple!(clause[0] == literal);
            return id;
        }
        lcg_assert_simple!(clause[0] == literal);

        proof.set_hint(clause.origin);
        let id = proof.write_clause(clause.literals(), &[]);
        clause.ident = Some(id);

        if clause.is_temporary() {
            proof.pending_deletions.push(id);
        }

        id
    }

    /// Write `clause` as derived from `antecedents`, which is cleared afterwards.
    pub(crate) fn log_resolve(
        &mut self,
        clause: &mut Clause,
        antecedents: &mut Vec<ClauseId>,
    ) -> ClauseId {
        let Some(proof) = self.internal_proof.as_mut() else {
            antecedents.clear();
            return DUMMY_CLAUSE_ID;
        };

        clause.origin = 0;
        let id = proof.write_clause(clause.literals(), antecedents);
        antecedents.clear();
        clause.ident = Some(id);
        id
    }

    /// Write `clause` as derived from the antecedents collected with
    /// [`ProofLog::push_antecedent`], then flush the pending deletions.
    pub(crate) fn resolve(&mut self, clause: &mut Clause) -> ClauseId {
        let Some(proof) = self.internal_proof.as_mut() else {
            return DUMMY_CLAUSE_ID;
        };

        let mut antecedents = std::mem::take(&mut proof.antecedents);
        let id = self.log_resolve(clause, &mut antecedents);

        if let Some(proof) = self.internal_proof.as_mut() {
            proof.antecedents = antecedents;
            proof.flush_deletions();
        }

        id
    }

    pub(crate) fn push_antecedent(&mut self, id: ClauseId) {
        if let Some(proof) = self.internal_proof.as_mut() {
            proof.antecedents.push(id);
        }
    }

    /// Write the empty clause, derived from `antecedents`.
    pub(crate) fn empty(&mut self, antecedents: &[ClauseId]) -> ClauseId {
        let Some(proof) = self.internal_proof.as_mut() else {
            return DUMMY_CLAUSE_ID;
        };

        let id = proof.write_clause(&[], antecedents);
        proof.flush_deletions();
        id
    }

    /// Retire the identifier of `clause`. The deletion is written after the next resolution
    /// step, so that it never precedes a line which uses the identifier.
    pub(crate) fn del(&mut self, clause: &mut Clause) {
        let Some(proof) = self.internal_proof.as_mut() else {
            return;
        };

        if clause.is_temporary() {
            return;
        }

        if let Some(id) = clause.ident.take() {
            proof.pending_deletions.push(id);
        }
    }

    /// Name an integer variable in the solution file and the literal semantics.
    pub fn bind_ivar(&mut self, variable: IntVarId, name: impl Into<String>) {
        let Some(proof) = self.internal_proof.as_mut() else {
            return;
        };

        let name = name.into();
        proof
            .bindings
            .push(Binding::new(name.clone(), BindingTarget::IntVar(variable)));
        let _ = proof.int_var_names.insert(variable, name);
    }

    /// Name a Boolean decision variable. `literal` is the literal which means `name` is true.
    pub fn bind_bvar(&mut self, literal: Literal, name: impl Into<String>) {
        let Some(proof) = self.internal_proof.as_mut() else {
            return;
        };

        let name = name.into();
        let relation = if literal.is_positive() {
            Relation::GreaterThanEqual
        } else {
            Relation::LessThan
        };
        proof.write_semantics(literal.variable(), &Atom::new(name.as_str(), relation, 1));
        proof
            .bindings
            .push(Binding::new(name, BindingTarget::Literal(literal)));
    }

    /// Record that `literal` stands for `[variable relation value]`.
    pub(crate) fn bind_atom(
        &mut self,
        literal: Literal,
        variable: IntVarId,
        relation: Relation,
        value: i32,
    ) {
        let Some(proof) = self.internal_proof.as_mut() else {
            return;
        };

        // An atom outside the domain is one of the constants, whose semantics are fixed.
        if literal.variable().index() < 2 {
            return;
        }

        let Some(name) = proof.int_var_names.get(&variable) else {
            warn!("cannot bind {literal} to an atom of unnamed variable {variable}");
            return;
        };

        let atom = Atom::new(name.clone(), relation, i64::from(value));
        let atom = if literal.is_positive() { atom } else { !atom };
        proof.write_semantics(literal.variable(), &atom);
    }

    /// Record that `literal` has the constant truth value `value`.
    pub(crate) fn bind_bool(&mut self, literal: Literal, value: bool) {
        if let Some(proof) = self.internal_proof.as_mut() {
            proof.write_constant(literal.variable(), literal.is_positive() == value);
        }
    }

    /// Capture the values of all bound variables. `value_of` gives the value of a target in
    /// the current assignment.
    pub(crate) fn save_model(&mut self, mut value_of: impl FnMut(BindingTarget) -> Option<i64>) {
        let Some(proof) = self.internal_proof.as_mut() else {
            return;
        };

        proof.has_model = true;
        for binding in proof.bindings.iter_mut() {
            binding.value = value_of(binding.target);
            lcg_assert_simple!(
                binding.value.is_some(),
                "{} is not fixed in the model",
                binding.name
            );
        }
    }

    /// Write the semantics line of a channel variable at the end of search.
    pub(crate) fn log_channel_semantics(
        &mut self,
        variable: BooleanVariable,
        info: ChannelInfo,
        assigned: Lbool,
    ) {
        let Some(proof) = self.internal_proof.as_mut() else {
            return;
        };

        if info.kind != ChannelKind::IntVar {
            return;
        }

        let owner = IntVarId::new(info.owner);
        let Some(name) = proof.int_var_names.get(&owner) else {
            warn!("variable {owner} has no name");
            if let Some(value) = assigned.to_option() {
                proof.write_constant(variable, value);
            }
            return;
        };

        let relation = match info.value_kind {
            ValueKind::Value => Relation::Equal,
            ValueKind::Bound => Relation::GreaterThan,
        };
        let atom = Atom::new(name.clone(), relation, i64::from(info.value));
        proof.write_semantics(variable, &atom);
    }

    /// Write the solution file if a model was saved, write the outstanding deletions and flush
    /// all files. The log is inactive afterwards.
    pub fn finalize(&mut self) -> Result<(), ProofError> {
        let Some(mut proof) = self.internal_proof.take() else {
            return Ok(());
        };

        proof.log_model();
        proof.flush_deletions();

        let trace_result = proof.trace.flush();
        proof.record(trace_result);
        let semantics_result = proof.semantics.flush();
        proof.record(semantics_result);

        match proof.error.take() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_deletions(&self) -> &[ClauseId] {
        self.internal_proof
            .as_ref()
            .map_or(&[], |proof| proof.pending_deletions.as_slice())
    }
}

impl ProofImpl {
    /// Keep the first write failure.
    fn record(&mut self, result: io::Result<()>) {
        if let Err(failure) = result {
            if self.error.is_none() {
                error!("failed to write proof: {failure}");
                self.error = Some(failure);
            }
        }
    }

    fn write_clause(&mut self, literals: &[Literal], antecedents: &[ClauseId]) -> ClauseId {
        let id = NonZeroU32::new(self.trace.num_identifiers() + 1).unwrap_or(DUMMY_CLAUSE_ID);

        let result = self
            .trace
            .log_clause(
                literals.iter().map(|literal| literal.to_trace_literal()),
                antecedents.iter().copied(),
            )
            .map(|_| ());
        self.record(result);

        id
    }

    fn set_hint(&mut self, item: u32) {
        let result = self.trace.set_hint(item);
        self.record(result);
    }

    fn flush_deletions(&mut self) {
        for index in 0..self.pending_deletions.len() {
            let result = self.trace.log_deletion(self.pending_deletions[index]);
            self.record(result);
        }
        self.pending_deletions.clear();
    }

    fn write_semantics(&mut self, variable: BooleanVariable, atom: &Atom<impl std::fmt::Display>) {
        let trace_variable =
            NonZeroU32::new(variable.trace_index()).unwrap_or(DUMMY_CLAUSE_ID);
        let result = write_definition(&mut self.semantics, trace_variable, atom);
        self.record(result);
    }

    /// Describe `variable` as the constant `value`, expressed over [`TRUE_CONSTANT`].
    fn write_constant(&mut self, variable: BooleanVariable, value: bool) {
        let relation = if value {
            Relation::GreaterThanEqual
        } else {
            Relation::LessThan
        };
        self.write_semantics(variable, &Atom::new(TRUE_CONSTANT, relation, 1));
    }

    fn log_model(&mut self) {
        if !self.has_model {
            return;
        }

        let mut solution = Solution::default();
        for binding in self.bindings.iter() {
            solution.push(binding.name.as_str(), binding.value.unwrap_or_default());
        }

        let result = match self.solution.take() {
            Some(SolutionSink::File(path)) => {
                create_writer(&path).and_then(|mut sink| {
                    solution.write(&mut sink)?;
                    sink.flush()
                })
            }
            Some(SolutionSink::Writer(mut sink)) => solution
                .write(&mut sink)
                .and_then(|_| sink.flush()),
            None => Ok(()),
        };
        self.record(result);
    }
}

fn create_writer(path: &Path) -> io::Result<Box<dyn Write>> {
    let file = File::create(path)?;

    if path.extension().is_some_and(|extension| extension == "gz") {
        #[cfg(feature = "gzipped-proofs")]
        {
            let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::fast());
            return Ok(Box::new(BufWriter::new(encoder)));
        }

        #[cfg(not(feature = "gzipped-proofs"))]
        warn!(
            "{} is written uncompressed; enable the `gzipped-proofs` feature",
            path.display()
        );
    }

    Ok(Box::new(BufWriter::new(file)))
}

#[cfg(test)]
pub(crate) mod test_sinks {
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    /// A writer whose contents can still be inspected after it has been handed to the log.
    #[derive(Clone, Debug, Default)]
    pub(crate) struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).expect("proof output is UTF-8")
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Buffers for the trace, the semantics and the solution.
    #[derive(Clone, Debug, Default)]
    pub(crate) struct ProofBuffers {
        pub(crate) trace: SharedBuffer,
        pub(crate) semantics: SharedBuffer,
        pub(crate) solution: SharedBuffer,
    }

    impl ProofBuffers {
        pub(crate) fn proof_log(&self) -> super::ProofLog {
            super::ProofLog::to_writers(
                Box::new(self.trace.clone()),
                Box::new(self.semantics.clone()),
                Box::new(self.solution.clone()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_sinks::ProofBuffers;
    use super::*;

    fn literal(index: u32, is_positive: bool) -> Literal {
        Literal::new(BooleanVariable::new(index), is_positive)
    }

    #[test]
    fn disabled_log_hands_out_the_dummy_identifier() {
        let mut proof = ProofLog::default();
        let mut clause = Clause::new(vec![literal(2, true), literal(3, false)], false, 0);

        assert_eq!(DUMMY_CLAUSE_ID, proof.intro(&mut clause));
        assert_eq!(None, clause.ident);
        assert!(proof.finalize().is_ok());
    }

    #[test]
    fn intro_is_idempotent() {
        let buffers = ProofBuffers::default();
        let mut proof = buffers.proof_log();
        let mut clause = Clause::new(vec![literal(2, true), literal(3, false)], false, 0);

        let first = proof.intro(&mut clause);
        let second = proof.intro(&mut clause);
        proof.finalize().unwrap();

        assert_eq!(first, second);
        assert_eq!("1 3 -4 0 0\n", buffers.trace.contents());
    }

    #[test]
    fn hints_are_written_when_the_origin_changes() {
        let buffers = ProofBuffers::default();
        let mut proof = buffers.proof_log();

        let mut first = Clause::new(vec![literal(2, true)], false, 4);
        let mut second = Clause::new(vec![literal(3, true)], false, 4);
        let mut third = Clause::new(vec![literal(4, true)], false, 0);
        let _ = proof.intro(&mut first);
        let _ = proof.intro(&mut second);
        let _ = proof.intro(&mut third);
        proof.finalize().unwrap();

        assert_eq!(
            "c c4\n1 3 0 0\n2 4 0 0\nc -\n3 5 0 0\n",
            buffers.trace.contents()
        );
    }

    #[test]
    fn deletions_are_written_after_the_next_resolution() {
        let buffers = ProofBuffers::default();
        let mut proof = buffers.proof_log();

        let mut input = Clause::new(vec![literal(2, true), literal(3, true)], false, 0);
        let input_id = proof.intro(&mut input);
        proof.del(&mut input);
        assert_eq!(None, input.ident);
        assert_eq!(&[input_id], proof.pending_deletions());

        let mut derived = Clause::new(vec![literal(2, true)], true, 0);
        proof.push_antecedent(input_id);
        let _ = proof.resolve(&mut derived);
        proof.finalize().unwrap();

        assert_eq!(
            "1 3 4 0 0\n2 3 0 1 0\nd 1\n",
            buffers.trace.contents()
        );
    }

    #[test]
    fn temporary_clauses_get_a_fresh_identifier_per_use() {
        let buffers = ProofBuffers::default();
        let mut proof = buffers.proof_log();

        let mut scratch = Clause::temporary(2, 0);
        scratch[1] = literal(5, false);
        let first = proof.infer(literal(2, true), &mut scratch);
        let second = proof.infer(literal(3, true), &mut scratch);

        assert_ne!(first, second);
        assert_eq!(&[first, second], proof.pending_deletions());
    }

    #[test]
    fn semantics_start_with_the_constants() {
        let buffers = ProofBuffers::default();
        let mut proof = buffers.proof_log();

        proof.bind_bvar(literal(2, false), "b");
        proof.finalize().unwrap();

        assert_eq!(
            "1 [lit_True >= 1]\n2 [lit_True < 1]\n3 [b < 1]\n",
            buffers.semantics.contents()
        );
    }

    #[test]
    fn solution_is_only_written_with_a_model() {
        let buffers = ProofBuffers::default();
        let mut proof = buffers.proof_log();
        proof.bind_bvar(literal(2, true), "b");
        proof.finalize().unwrap();
        assert_eq!("", buffers.solution.contents());

        let buffers = ProofBuffers::default();
        let mut proof = buffers.proof_log();
        proof.bind_bvar(literal(2, true), "b");
        proof.save_model(|target| match target {
            BindingTarget::Literal(_) => Some(1),
            BindingTarget::IntVar(_) => None,
        });
        proof.finalize().unwrap();
        assert_eq!("[lit_True = 1, b = 1]", buffers.solution.contents());
    }

    #[test]
    fn unnamed_channel_variable_falls_back_to_a_constant() {
        let buffers = ProofBuffers::default();
        let mut proof = buffers.proof_log();

        let info = ChannelInfo::int_var(0, ValueKind::Bound, 3);
        proof.log_channel_semantics(BooleanVariable::new(4), info, Lbool::False);
        proof.log_channel_semantics(BooleanVariable::new(5), info, Lbool::Undefined);
        proof.finalize().unwrap();

        assert_eq!(
            "1 [lit_True >= 1]\n2 [lit_True < 1]\n5 [lit_True < 1]\n",
            buffers.semantics.contents()
        );
    }

    #[test]
    fn named_channel_variables_describe_their_atom() {
        let buffers = ProofBuffers::default();
        let mut proof = buffers.proof_log();
        proof.bind_ivar(IntVarId::new(0), "x");

        let value = ChannelInfo::int_var(0, ValueKind::Value, 3);
        let bound = ChannelInfo::int_var(0, ValueKind::Bound, 3);
        proof.log_channel_semantics(BooleanVariable::new(2), value, Lbool::Undefined);
        proof.log_channel_semantics(BooleanVariable::new(3), bound, Lbool::Undefined);
        proof.bind_atom(literal(3, false), IntVarId::new(0), Relation::GreaterThan, 3);
        proof.finalize().unwrap();

        assert_eq!(
            "1 [lit_True >= 1]\n2 [lit_True < 1]\n3 [x = 3]\n4 [x > 3]\n4 [x <= 3]\n",
            buffers.semantics.contents()
        );
    }
}
