use pyo3::prelude::*;
use pyo3::types::{PyModule, PyModuleMethods};
use pyo3::{Bound, PyResult, Python};

mod area_search;

use crate::area_search::{create, AreaSearchWrapper};

#[pymodule]
fn areasearch(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<AreaSearchWrapper>()?;
    m.add_function(wrap_pyfunction!(create, m)?)?;
    Ok(())
}
