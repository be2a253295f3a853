//! Graph ops that process records.

mod input_ndjson_op;
pub use input_ndjson_op::*;

mod rename_op;
pub use rename_op::*;

mod standardize_op;
pub use standardize_op::*;

mod min_length_op;
pub use min_length_op::*;

mod drop_sequence_op;
pub use drop_sequence_op::*;

mod set_op;
pub use set_op::*;

mod strain_name_op;
pub use strain_name_op::*;

mod geography_op;
pub use geography_op::*;

mod authors_op;
pub use authors_op::*;

mod geo_rules_op;
pub use geo_rules_op::*;

mod annotate_op;
pub use annotate_op::*;

mod exposure_op;
pub use exposure_op::*;

mod problem_op;
pub use problem_op::*;

mod line_number_op;
pub use line_number_op::*;

mod output_fasta_op;
pub use output_fasta_op::*;

mod for_each_op;
pub use for_each_op::*;

mod retain_op;
pub use retain_op::*;
