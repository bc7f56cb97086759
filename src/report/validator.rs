use std::fmt;

use tracing::{debug, instrument, warn};

use super::formula::Formula;
use super::layout::ReportShape;
use super::sheet::{CellAddress, CellValue, RenderSink, SheetError};

const NUMERIC_TYPE_CODE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    AllNumeric,
    PossiblyCorrupt,
}

impl ValidationResult {
    pub fn message(&self) -> &'static str {
        match self {
            ValidationResult::AllNumeric => "Все данные числового типа.",
            ValidationResult::PossiblyCorrupt => "Таблица может содержать некорректные данные.",
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Check that the rendered sheet still stores every data cell as a number.
///
/// A `=TYPE(..)` probe is written into the scratch cell one column past the
/// table in the header row, once per cell of columns `A..=C+1`, rows `2..=R+1`,
/// column by column. The first non-numeric type code ends the sweep. The
/// scratch cell is cleared afterwards, also when the sweep fails.
#[instrument(skip(sink))]
pub fn validate_numeric_cells<S: RenderSink>(
    sink: &mut S,
    shape: ReportShape,
) -> Result<ValidationResult, SheetError> {
    let scratch = CellAddress::new(1, shape.columns + 1);
    let outcome = sweep(sink, shape, scratch);
    sink.clear(scratch)?;
    outcome
}

fn sweep<S: RenderSink>(
    sink: &mut S,
    shape: ReportShape,
    scratch: CellAddress,
) -> Result<ValidationResult, SheetError> {
    let mut probed = 0;

    for col in 1..=shape.columns + 1 {
        for row in 2..=shape.rows + 1 {
            let target = CellAddress::new(row, col);
            sink.write_formula(scratch, &Formula::TypeOf(target).to_string())?;
            probed += 1;

            match sink.read_back(scratch)? {
                CellValue::Number(code) if code == NUMERIC_TYPE_CODE => {}
                other => {
                    warn!("Cell {} is not numeric (type {:?})", target, other);
                    return Ok(ValidationResult::PossiblyCorrupt);
                }
            }
        }
    }

    debug!("Probed {} cells, all numeric", probed);
    Ok(ValidationResult::AllNumeric)
}
