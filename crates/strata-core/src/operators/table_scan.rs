//! The table scan operator.
//!
//! `TableScan` evaluates a single comparison predicate over one column and
//! returns a new table whose columns are all reference segments into the
//! scanned (ultimate, non-reference) source. The scan is monomorphized per
//! element type; per chunk it dispatches on the predicate column's segment
//! kind:
//!
//! - value segments get a plain typed loop,
//! - dictionary segments are short-circuited through order statistics of the
//!   sorted dictionary (emit nothing / emit everything / test codes against
//!   a single bound),
//! - reference segments are resolved per referenced chunk, reusing the
//!   dictionary short-circuits there and inheriting the input's positions.

use std::fmt;
use std::sync::Arc;

use strata_common::collections::{strata_map, strata_map_with_capacity, strata_set, StrataMap};
use strata_common::{
    ChunkId, ChunkOffset, ColumnId, ColumnType, DataType, Error, PosList, Result, RowId, Value,
    ValueId,
};

use super::Operator;
use crate::storage::{
    AttributeVector, Chunk, DictionarySegment, ReferenceSegment, Segment, SegmentAccess, Table,
    ValueSegment,
};

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl CompareOp {
    /// Whether an `ordering` of a row value relative to the literal
    /// satisfies this operator.
    #[inline]
    #[must_use]
    pub fn matches(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};
        match self {
            CompareOp::Eq => ordering == Equal,
            CompareOp::Ne => ordering != Equal,
            CompareOp::Lt => ordering == Less,
            CompareOp::Le => ordering != Greater,
            CompareOp::Gt => ordering == Greater,
            CompareOp::Ge => ordering != Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        };
        f.write_str(symbol)
    }
}

/// Scans one column of the input for rows matching `column op literal`.
///
/// The result table has the input's schema and its rows in input order;
/// every result column is a [`ReferenceSegment`] into the scanned data. The
/// literal must already have the column's declared type - there is no
/// coercion.
pub struct TableScan {
    input: Box<dyn Operator>,
    column_id: ColumnId,
    op: CompareOp,
    literal: Value,
    target_pos_list_size: usize,
}

impl TableScan {
    /// Creates a scan of `column_id op literal` over the input operator's
    /// result.
    #[must_use]
    pub fn new(input: Box<dyn Operator>, column_id: ColumnId, op: CompareOp, literal: Value) -> Self {
        Self {
            input,
            column_id,
            op,
            literal,
            target_pos_list_size: ChunkOffset::MAX as usize,
        }
    }

    /// Caps (approximately) how many output positions accumulate before a
    /// result chunk is emitted. Advisory; affects only materialized-source
    /// chunks, and never reorders rows.
    #[must_use]
    pub fn with_target_pos_list_size(mut self, target: usize) -> Self {
        self.target_pos_list_size = target.max(1);
        self
    }

    /// The scanned column.
    #[must_use]
    pub const fn column_id(&self) -> ColumnId {
        self.column_id
    }

    /// The comparison operator.
    #[must_use]
    pub const fn compare_op(&self) -> CompareOp {
        self.op
    }

    /// The comparison literal.
    #[must_use]
    pub const fn literal(&self) -> &Value {
        &self.literal
    }
}

impl Operator for TableScan {
    fn execute(&mut self) -> Result<Arc<Table>> {
        let table = self.input.execute()?;
        let column_type = table.column_type(self.column_id)?;
        if self.literal.data_type() != column_type {
            return Err(Error::TypeMismatch {
                expected: column_type,
                found: self.literal.data_type(),
            });
        }

        let result = match column_type {
            DataType::Int32 => self.scan_table::<i32>(&table),
            DataType::Int64 => self.scan_table::<i64>(&table),
            DataType::Float32 => self.scan_table::<f32>(&table),
            DataType::Float64 => self.scan_table::<f64>(&table),
            DataType::String => self.scan_table::<arcstr::ArcStr>(&table),
        }?;

        tracing::debug!(
            column = self.column_id.0,
            op = %self.op,
            rows = result.row_count(),
            "table scan finished"
        );
        Ok(Arc::new(result))
    }

    fn name(&self) -> &'static str {
        "TableScan"
    }
}

impl TableScan {
    fn scan_table<T: SegmentAccess>(&self, table: &Arc<Table>) -> Result<Table> {
        let literal = T::from_value(&self.literal)?;

        let mut result = Table::new(table.max_chunk_size());
        for index in 0..table.column_count() {
            let column_id = ColumnId::new(index as u16);
            result.add_column(table.column_name(column_id)?, table.column_type(column_id)?)?;
        }

        let mut scan = TypedScan {
            table: Arc::clone(table),
            column_id: self.column_id,
            op: self.op,
            literal,
            target_pos_list_size: self.target_pos_list_size,
            matched_offsets: Vec::new(),
            add_all: false,
            result,
        };

        for index in 0..table.chunk_count() {
            let chunk_id = ChunkId::new(index as u32);
            let chunk = table.chunk(chunk_id).ok_or_else(|| {
                Error::Internal(format!("chunk {chunk_id} vanished during the scan"))
            })?;
            scan.process_chunk(chunk_id, chunk)?;
            scan.finish_chunk(chunk_id, chunk)?;
        }

        Ok(scan.result)
    }
}

/// Per-execution scan state, monomorphic in the column element type.
struct TypedScan<T: SegmentAccess> {
    table: Arc<Table>,
    column_id: ColumnId,
    op: CompareOp,
    literal: T,
    target_pos_list_size: usize,
    /// Offsets of the current chunk selected so far.
    matched_offsets: Vec<ChunkOffset>,
    /// Set instead of materializing every offset when a short-circuit proves
    /// the whole chunk matches.
    add_all: bool,
    result: Table,
}

impl<T: SegmentAccess> TypedScan<T> {
    /// Runs the predicate over one chunk, filling `matched_offsets` /
    /// `add_all`.
    fn process_chunk(&mut self, chunk_id: ChunkId, chunk: &Chunk) -> Result<()> {
        let predicate_segment = chunk.segment(self.column_id).ok_or_else(|| {
            Error::Internal(format!("chunk {chunk_id} is missing the predicate column"))
        })?;

        // A chunk is either fully materialized or fully reference-backed;
        // anything else breaks output assembly.
        let reference_chunk = predicate_segment.is_reference();
        if chunk
            .segments()
            .iter()
            .any(|segment| segment.is_reference() != reference_chunk)
        {
            return Err(Error::MixedIndirection(chunk_id));
        }

        match predicate_segment {
            Segment::Value(any) => {
                let segment = T::as_value_segment(any)
                    .ok_or_else(|| segment_type_drift(chunk_id, self.column_id))?;
                self.process_value_segment(segment);
                Ok(())
            }
            Segment::Dictionary(any) => {
                let segment = T::as_dictionary_segment(any)
                    .ok_or_else(|| segment_type_drift(chunk_id, self.column_id))?;
                self.process_dictionary_segment(segment);
                Ok(())
            }
            Segment::Reference(segment) => self.process_reference_segment(segment),
        }
    }

    fn process_value_segment(&mut self, segment: &ValueSegment<T>) {
        for (offset, value) in segment.values().iter().enumerate() {
            if self.op.matches(value.compare(&self.literal)) {
                self.matched_offsets.push(offset as ChunkOffset);
            }
        }
    }

    fn process_dictionary_segment(&mut self, segment: &DictionarySegment<T>) {
        let flags = DictionaryScanFlags::new(segment, self.op, &self.literal);
        if flags.add_none {
            return;
        }
        if flags.add_all {
            self.add_all = true;
            return;
        }

        let attributes = segment.attribute_vector();
        for index in 0..attributes.size() {
            if flags.matches(attributes.get(index)) {
                self.matched_offsets.push(index as ChunkOffset);
            }
        }
    }

    /// Evaluates the predicate behind a reference segment.
    ///
    /// Positions are grouped by referenced chunk so that dictionary
    /// processing flags are computed once per referenced chunk; matching
    /// rows inherit the *input* segment's offsets, so the result keeps
    /// pointing at the ultimate table.
    fn process_reference_segment(&mut self, segment: &ReferenceSegment) -> Result<()> {
        let referenced_table = segment.referenced_table();
        let referenced_column_id = segment.referenced_column_id();
        let pos_list = segment.pos_list();

        let mut referenced_chunk_ids = strata_set();
        for row_id in pos_list.iter() {
            referenced_chunk_ids.insert(row_id.chunk_id);
        }

        let mut per_chunk: StrataMap<ChunkId, ReferencedColumn<'_, T>> =
            strata_map_with_capacity(referenced_chunk_ids.len());
        let mut every_referenced_chunk_matches_completely = true;

        for &chunk_id in &referenced_chunk_ids {
            let chunk = referenced_table.chunk(chunk_id).ok_or_else(|| {
                Error::Internal(format!(
                    "reference segment points at missing chunk {chunk_id}"
                ))
            })?;
            let referenced_segment = chunk.segment(referenced_column_id).ok_or_else(|| {
                Error::Internal(format!(
                    "reference segment points at missing column {referenced_column_id}"
                ))
            })?;

            match referenced_segment {
                Segment::Dictionary(any) => {
                    let dictionary = T::as_dictionary_segment(any)
                        .ok_or_else(|| segment_type_drift(chunk_id, referenced_column_id))?;
                    let flags = DictionaryScanFlags::new(dictionary, self.op, &self.literal);
                    every_referenced_chunk_matches_completely &= flags.add_all;
                    per_chunk.insert(
                        chunk_id,
                        ReferencedColumn::Dictionary {
                            flags,
                            attributes: dictionary.attribute_vector(),
                        },
                    );
                }
                Segment::Value(any) => {
                    let values = T::as_value_segment(any)
                        .ok_or_else(|| segment_type_drift(chunk_id, referenced_column_id))?;
                    every_referenced_chunk_matches_completely = false;
                    per_chunk.insert(chunk_id, ReferencedColumn::Value(values));
                }
                Segment::Reference(_) => {
                    return Err(Error::Internal(
                        "reference segment points at another reference segment".to_string(),
                    ));
                }
            }
        }

        // Every referenced dictionary chunk already proved all its rows
        // match, so the whole pos list survives verbatim.
        if every_referenced_chunk_matches_completely {
            self.add_all = true;
            return Ok(());
        }

        for (index, row_id) in pos_list.iter().enumerate() {
            let keep = match per_chunk.get(&row_id.chunk_id) {
                Some(ReferencedColumn::Dictionary { flags, attributes }) => {
                    if flags.add_none {
                        false
                    } else if flags.add_all {
                        true
                    } else {
                        flags.matches(attributes.get_at_offset(row_id.chunk_offset))
                    }
                }
                Some(ReferencedColumn::Value(values)) => self
                    .op
                    .matches(values.get(row_id.chunk_offset).compare(&self.literal)),
                None => {
                    return Err(Error::Internal(
                        "referenced chunk missing from the grouping pass".to_string(),
                    ))
                }
            };
            if keep {
                self.matched_offsets.push(index as ChunkOffset);
            }
        }
        Ok(())
    }

    /// Turns the current selection into reference-segment chunks of the
    /// result table, then resets the per-chunk state.
    fn finish_chunk(&mut self, chunk_id: ChunkId, source_chunk: &Chunk) -> Result<()> {
        if self.matched_offsets.is_empty() && !self.add_all {
            return Ok(());
        }

        let reference_chunk = source_chunk
            .segment(self.column_id)
            .is_some_and(Segment::is_reference);
        if reference_chunk {
            self.emit_reference_sourced_chunk(source_chunk)?;
        } else {
            self.emit_materialized_sourced_chunks(chunk_id, source_chunk);
        }

        self.matched_offsets.clear();
        self.add_all = false;
        Ok(())
    }

    /// Output assembly when the source chunk is reference-backed: rewrite
    /// (or, for `add_all`, alias) each source pos list, memoized per list so
    /// columns sharing a list keep sharing.
    fn emit_reference_sourced_chunk(&mut self, source_chunk: &Chunk) -> Result<()> {
        let mut result_chunk = Chunk::new();

        if self.add_all {
            for segment in source_chunk.segments() {
                let source = expect_reference(segment)?;
                result_chunk.add_segment(Segment::Reference(ReferenceSegment::new(
                    Arc::clone(source.referenced_table()),
                    source.referenced_column_id(),
                    Arc::clone(source.pos_list()),
                )));
            }
        } else {
            let mut rewritten: StrataMap<*const PosList, Arc<PosList>> = strata_map();
            for segment in source_chunk.segments() {
                let source = expect_reference(segment)?;
                let source_positions = source.pos_list();
                let positions = rewritten
                    .entry(Arc::as_ptr(source_positions))
                    .or_insert_with(|| {
                        Arc::new(
                            self.matched_offsets
                                .iter()
                                .map(|&offset| source_positions[offset as usize])
                                .collect(),
                        )
                    })
                    .clone();
                result_chunk.add_segment(Segment::Reference(ReferenceSegment::new(
                    Arc::clone(source.referenced_table()),
                    source.referenced_column_id(),
                    positions,
                )));
            }
        }

        self.result.emplace_chunk(result_chunk);
        Ok(())
    }

    /// Output assembly when the source chunk is materialized: one pos list
    /// of `(chunk_id, offset)` shared by every column, split into batches
    /// when the advisory target size is exceeded.
    fn emit_materialized_sourced_chunks(&mut self, chunk_id: ChunkId, source_chunk: &Chunk) {
        let mut shared_lists: Vec<Arc<PosList>> = Vec::new();
        if self.add_all {
            let positions: PosList = (0..source_chunk.size() as ChunkOffset)
                .map(|offset| RowId::new(chunk_id, offset))
                .collect();
            shared_lists.push(Arc::new(positions));
        } else {
            for batch in self.matched_offsets.chunks(self.target_pos_list_size) {
                let positions: PosList = batch
                    .iter()
                    .map(|&offset| RowId::new(chunk_id, offset))
                    .collect();
                shared_lists.push(Arc::new(positions));
            }
        }

        for positions in shared_lists {
            let mut result_chunk = Chunk::new();
            for column_index in 0..source_chunk.column_count() {
                result_chunk.add_segment(Segment::Reference(ReferenceSegment::new(
                    Arc::clone(&self.table),
                    ColumnId::new(column_index as u16),
                    Arc::clone(&positions),
                )));
            }
            self.result.emplace_chunk(result_chunk);
        }
    }
}

/// What the scan found behind one referenced chunk's column.
enum ReferencedColumn<'a, T: ColumnType> {
    Dictionary {
        flags: DictionaryScanFlags,
        attributes: &'a AttributeVector,
    },
    Value(&'a ValueSegment<T>),
}

/// The per-(dictionary, predicate) memo: emit nothing, emit everything, or
/// test each code against a single bound.
struct DictionaryScanFlags {
    add_none: bool,
    add_all: bool,
    predicate: CodePredicate,
}

/// The code-level predicate a comparison reduces to once the literal has
/// been located in the sorted dictionary.
#[derive(Clone, Copy)]
enum CodePredicate {
    EqualTo(ValueId),
    NotEqualTo(ValueId),
    Below(ValueId),
    AtOrAbove(ValueId),
}

impl DictionaryScanFlags {
    fn new<T: ColumnType>(segment: &DictionarySegment<T>, op: CompareOp, literal: &T) -> Self {
        match op {
            CompareOp::Eq => {
                let matching = segment.lower_bound(literal);
                Self {
                    add_none: !exact_match(segment, matching, literal),
                    add_all: false,
                    predicate: CodePredicate::EqualTo(matching),
                }
            }
            CompareOp::Ne => {
                let matching = segment.lower_bound(literal);
                Self {
                    add_none: false,
                    add_all: !exact_match(segment, matching, literal),
                    predicate: CodePredicate::NotEqualTo(matching),
                }
            }
            // Le is Lt with the upper bound: both keep codes strictly below
            // the matching id.
            CompareOp::Lt | CompareOp::Le => {
                let matching = if op == CompareOp::Lt {
                    segment.lower_bound(literal)
                } else {
                    segment.upper_bound(literal)
                };
                Self {
                    add_none: matching == ValueId::new(0),
                    add_all: !matching.is_valid(),
                    predicate: CodePredicate::Below(matching),
                }
            }
            // Gt is Ge with the upper bound: both keep codes at or above the
            // matching id.
            CompareOp::Ge | CompareOp::Gt => {
                let matching = if op == CompareOp::Ge {
                    segment.lower_bound(literal)
                } else {
                    segment.upper_bound(literal)
                };
                Self {
                    add_none: !matching.is_valid(),
                    add_all: matching == ValueId::new(0),
                    predicate: CodePredicate::AtOrAbove(matching),
                }
            }
        }
    }

    /// Whether a stored code satisfies the predicate. Only meaningful when
    /// neither short-circuit flag is set.
    #[inline]
    fn matches(&self, code: ValueId) -> bool {
        match self.predicate {
            CodePredicate::EqualTo(matching) => code == matching,
            CodePredicate::NotEqualTo(matching) => code != matching,
            CodePredicate::Below(matching) => code < matching,
            CodePredicate::AtOrAbove(matching) => code >= matching,
        }
    }
}

/// Whether `matching` names a dictionary entry equal to the literal.
fn exact_match<T: ColumnType>(
    segment: &DictionarySegment<T>,
    matching: ValueId,
    literal: &T,
) -> bool {
    matching.is_valid() && segment.dictionary()[matching.as_usize()].equals(literal)
}

fn expect_reference(segment: &Segment) -> Result<&ReferenceSegment> {
    match segment {
        Segment::Reference(reference) => Ok(reference),
        Segment::Value(_) | Segment::Dictionary(_) => Err(Error::Internal(
            "output assembly expected a reference segment".to_string(),
        )),
    }
}

fn segment_type_drift(chunk_id: ChunkId, column_id: ColumnId) -> Error {
    Error::Internal(format!(
        "segment in chunk {chunk_id}, column {column_id} does not match the declared column type"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::TableWrapper;
    use crate::storage::DEFAULT_MAX_CHUNK_SIZE;
    use strata_common::DataType;

    fn int_table(values: &[i32], max_chunk_size: u32) -> Arc<Table> {
        let mut table = Table::new(max_chunk_size);
        table.add_column("x", DataType::Int32).unwrap();
        for &v in values {
            table.append(vec![Value::Int32(v)]).unwrap();
        }
        Arc::new(table)
    }

    fn scan(table: &Arc<Table>, op: CompareOp, literal: Value) -> Arc<Table> {
        TableScan::new(
            Box::new(TableWrapper::new(Arc::clone(table))),
            ColumnId::new(0),
            op,
            literal,
        )
        .execute()
        .unwrap()
    }

    fn column_values(table: &Table, column_id: ColumnId) -> Vec<Value> {
        let mut values = Vec::new();
        for index in 0..table.chunk_count() {
            let chunk = table.chunk(ChunkId::new(index as u32)).unwrap();
            for offset in 0..chunk.size() {
                values.push(
                    chunk
                        .segment(column_id)
                        .unwrap()
                        .value_at(offset as ChunkOffset)
                        .unwrap(),
                );
            }
        }
        values
    }

    #[test]
    fn test_compare_op_matches() {
        use std::cmp::Ordering::{Equal, Greater, Less};
        assert!(CompareOp::Eq.matches(Equal));
        assert!(!CompareOp::Eq.matches(Less));
        assert!(CompareOp::Ne.matches(Greater));
        assert!(CompareOp::Lt.matches(Less));
        assert!(CompareOp::Le.matches(Equal));
        assert!(!CompareOp::Le.matches(Greater));
        assert!(CompareOp::Gt.matches(Greater));
        assert!(CompareOp::Ge.matches(Equal));
    }

    #[test]
    fn test_value_scan_every_operator() {
        let table = int_table(&[3, 5, 3, 7, 5], DEFAULT_MAX_CHUNK_SIZE);
        let cases = [
            (CompareOp::Eq, vec![3, 3]),
            (CompareOp::Ne, vec![5, 7, 5]),
            (CompareOp::Lt, vec![]),
            (CompareOp::Le, vec![3, 3]),
            (CompareOp::Gt, vec![5, 7, 5]),
            (CompareOp::Ge, vec![3, 5, 3, 7, 5]),
        ];
        for (op, expected) in cases {
            let result = scan(&table, op, Value::Int32(3));
            let expected: Vec<Value> = expected.into_iter().map(Value::Int32).collect();
            assert_eq!(column_values(&result, ColumnId::new(0)), expected, "{op}");
        }
    }

    #[test]
    fn test_scan_preserves_chunked_order() {
        let table = int_table(&[3, 5, 3, 7, 5], 2);
        let result = scan(&table, CompareOp::Eq, Value::Int32(3));
        assert_eq!(
            column_values(&result, ColumnId::new(0)),
            vec![Value::Int32(3), Value::Int32(3)]
        );
        // Matches came from chunks 0 and 1; chunk 2 contributed nothing.
        assert_eq!(result.chunk_count(), 2);
    }

    #[test]
    fn test_dictionary_scan_matches_value_scan() {
        let values = [0, 2, 4, 6, 8, 10, 4, 2];
        let plain = int_table(&values, 4);
        let mut compressed = Table::new(4);
        compressed.add_column("x", DataType::Int32).unwrap();
        for &v in &values {
            compressed.append(vec![Value::Int32(v)]).unwrap();
        }
        compressed.compress_chunk(ChunkId(0)).unwrap();
        compressed.compress_chunk(ChunkId(1)).unwrap();
        let compressed = Arc::new(compressed);

        for op in [
            CompareOp::Eq,
            CompareOp::Ne,
            CompareOp::Lt,
            CompareOp::Le,
            CompareOp::Gt,
            CompareOp::Ge,
        ] {
            for literal in [-1, 0, 3, 4, 10, 11] {
                let from_plain = scan(&plain, op, Value::Int32(literal));
                let from_compressed = scan(&compressed, op, Value::Int32(literal));
                assert_eq!(
                    column_values(&from_plain, ColumnId::new(0)),
                    column_values(&from_compressed, ColumnId::new(0)),
                    "{op} {literal}"
                );
            }
        }
    }

    #[test]
    fn test_dictionary_add_none_emits_no_chunk() {
        let mut table = Table::new(8);
        table.add_column("x", DataType::Int32).unwrap();
        for v in [3, 5, 3, 7, 5] {
            table.append(vec![Value::Int32(v)]).unwrap();
        }
        table.compress_chunk(ChunkId(0)).unwrap();
        let result = scan(&Arc::new(table), CompareOp::Eq, Value::Int32(4));

        assert_eq!(result.row_count(), 0);
        // No output chunk was appended; only the initial empty one exists.
        assert_eq!(result.chunk_count(), 1);
    }

    #[test]
    fn test_dictionary_add_all_returns_everything() {
        let mut table = Table::new(8);
        table.add_column("x", DataType::Int32).unwrap();
        for _ in 0..3 {
            table.append(vec![Value::Int32(2)]).unwrap();
        }
        table.compress_chunk(ChunkId(0)).unwrap();
        let result = scan(&Arc::new(table), CompareOp::Ne, Value::Int32(5));

        assert_eq!(
            column_values(&result, ColumnId::new(0)),
            vec![Value::Int32(2); 3]
        );
    }

    #[test]
    fn test_dictionary_range_scan() {
        let mut table = Table::new(8);
        table.add_column("x", DataType::Int32).unwrap();
        for v in [0, 2, 4, 6, 8, 10] {
            table.append(vec![Value::Int32(v)]).unwrap();
        }
        table.compress_chunk(ChunkId(0)).unwrap();
        let result = scan(&Arc::new(table), CompareOp::Gt, Value::Int32(4));

        assert_eq!(
            column_values(&result, ColumnId::new(0)),
            vec![Value::Int32(6), Value::Int32(8), Value::Int32(10)]
        );
    }

    #[test]
    fn test_bad_column_fails() {
        let table = int_table(&[1], 4);
        let mut op = TableScan::new(
            Box::new(TableWrapper::new(table)),
            ColumnId::new(5),
            CompareOp::Eq,
            Value::Int32(1),
        );
        assert!(matches!(
            op.execute().unwrap_err(),
            Error::ColumnOutOfRange { .. }
        ));
    }

    #[test]
    fn test_literal_type_is_strict() {
        let table = int_table(&[1], 4);
        let mut op = TableScan::new(
            Box::new(TableWrapper::new(table)),
            ColumnId::new(0),
            CompareOp::Eq,
            Value::Int64(1),
        );
        assert_eq!(
            op.execute().unwrap_err(),
            Error::TypeMismatch {
                expected: DataType::Int32,
                found: DataType::Int64,
            }
        );
    }

    #[test]
    fn test_scan_over_references_targets_ultimate_table() {
        let base = int_table(&[1, 2, 3, 4, 5, 6], 2);
        let first = scan(&base, CompareOp::Gt, Value::Int32(1));
        let second = scan(&first, CompareOp::Lt, Value::Int32(6));

        assert_eq!(
            column_values(&second, ColumnId::new(0)),
            (2..=5).map(Value::Int32).collect::<Vec<_>>()
        );
        // Result segments reference the base table, not the first scan.
        for index in 0..second.chunk_count() {
            let chunk = second.chunk(ChunkId::new(index as u32)).unwrap();
            let Some(Segment::Reference(reference)) = chunk.segment(ColumnId::new(0)) else {
                panic!("scan output must be reference segments");
            };
            assert!(Arc::ptr_eq(reference.referenced_table(), &base));
        }
    }

    #[test]
    fn test_reference_add_all_aliases_the_pos_list() {
        let mut compressed = Table::new(4);
        compressed.add_column("x", DataType::Int32).unwrap();
        for v in [1, 2, 3, 4] {
            compressed.append(vec![Value::Int32(v)]).unwrap();
        }
        compressed.compress_chunk(ChunkId(0)).unwrap();
        let compressed = Arc::new(compressed);

        let first = scan(&compressed, CompareOp::Gt, Value::Int32(1));
        // Every referenced dictionary chunk matches completely for x != 0.
        let second = scan(&first, CompareOp::Ne, Value::Int32(0));

        let first_chunk = first.chunk(ChunkId(0)).unwrap();
        let second_chunk = second.chunk(ChunkId(0)).unwrap();
        let Some(Segment::Reference(first_segment)) = first_chunk.segment(ColumnId::new(0)) else {
            panic!("expected reference segment");
        };
        let Some(Segment::Reference(second_segment)) = second_chunk.segment(ColumnId::new(0))
        else {
            panic!("expected reference segment");
        };
        assert!(Arc::ptr_eq(first_segment.pos_list(), second_segment.pos_list()));
    }

    #[test]
    fn test_materialized_columns_share_one_pos_list() {
        let mut table = Table::new(8);
        table.add_column("x", DataType::Int32).unwrap();
        table.add_column("y", DataType::Int64).unwrap();
        for i in 0..4 {
            table
                .append(vec![Value::Int32(i), Value::Int64(i64::from(i) * 10)])
                .unwrap();
        }
        let result = scan(&Arc::new(table), CompareOp::Ge, Value::Int32(2));

        let chunk = result.chunk(ChunkId(0)).unwrap();
        let Some(Segment::Reference(x)) = chunk.segment(ColumnId::new(0)) else {
            panic!("expected reference segment");
        };
        let Some(Segment::Reference(y)) = chunk.segment(ColumnId::new(1)) else {
            panic!("expected reference segment");
        };
        assert!(Arc::ptr_eq(x.pos_list(), y.pos_list()));
        assert_eq!(
            column_values(&result, ColumnId::new(1)),
            vec![Value::Int64(20), Value::Int64(30)]
        );
    }

    #[test]
    fn test_mixed_indirection_is_rejected() {
        let base = int_table(&[1, 2, 3], 4);
        let referenced = scan(&base, CompareOp::Ge, Value::Int32(1));
        let reference_chunk = referenced.chunk(ChunkId(0)).unwrap();

        // Hand-build a chunk mixing a reference segment with a value segment.
        let mut mixed = Table::new(4);
        mixed.add_column_definition("a", DataType::Int32);
        mixed.add_column_definition("b", DataType::Int32);
        let mut chunk = Chunk::new();
        chunk.add_segment(reference_chunk.segments()[0].clone());
        let mut plain = crate::storage::AnyValueSegment::new(DataType::Int32);
        for v in [7, 8, 9] {
            plain.append(&Value::Int32(v)).unwrap();
        }
        chunk.add_segment(Segment::Value(plain));
        mixed.emplace_chunk(chunk);

        let mut op = TableScan::new(
            Box::new(TableWrapper::new(Arc::new(mixed))),
            ColumnId::new(1),
            CompareOp::Eq,
            Value::Int32(8),
        );
        assert_eq!(
            op.execute().unwrap_err(),
            Error::MixedIndirection(ChunkId(0))
        );
    }

    #[test]
    fn test_target_pos_list_size_splits_output() {
        let table = int_table(&[1, 2, 3, 4, 5, 6, 7, 8], 8);
        let result = TableScan::new(
            Box::new(TableWrapper::new(table)),
            ColumnId::new(0),
            CompareOp::Gt,
            Value::Int32(2),
        )
        .with_target_pos_list_size(2)
        .execute()
        .unwrap();

        // Six matches in batches of two.
        assert_eq!(result.chunk_count(), 3);
        assert_eq!(
            column_values(&result, ColumnId::new(0)),
            (3..=8).map(Value::Int32).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_string_scan() {
        let mut table = Table::new(4);
        table.add_column("name", DataType::String).unwrap();
        for name in ["k", "a", "k", "z"] {
            table.append(vec![Value::from(name)]).unwrap();
        }
        let result = scan(&Arc::new(table), CompareOp::Eq, Value::from("k"));
        assert_eq!(
            column_values(&result, ColumnId::new(0)),
            vec![Value::from("k"), Value::from("k")]
        );
    }

    #[test]
    fn test_scan_empty_table() {
        let table = int_table(&[], 4);
        let result = scan(&table, CompareOp::Eq, Value::Int32(1));
        assert_eq!(result.row_count(), 0);
        assert_eq!(result.column_count(), 1);
    }
}
