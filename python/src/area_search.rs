use ::areagrid::grid::{AreaGrid, Config, DEFAULT_QUERY_LIMIT};
use ::areagrid::AreaGridError;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::pyclass;
use pyo3::pymethods;
use pyo3::types::{PyDict, PyDictMethods};
use pyo3::{Bound, PyErr, PyResult, Python};
use std::collections::HashSet;

/// Host-facing handle. `grid` is `None` once `destroy` has run.
#[pyclass(name = "AreaSearch", unsendable)]
pub struct AreaSearchWrapper {
    grid: Option<AreaGrid>,
}

fn map_area_grid_error(err: AreaGridError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn destroyed() -> PyErr {
    PyValueError::new_err("area search has been destroyed")
}

fn clamp_limit(limit: i64) -> usize {
    limit.max(0) as usize
}

fn to_set(ids: Vec<u64>) -> HashSet<u64> {
    ids.into_iter().collect()
}

/// Same as `AreaSearch(bound_x, bound_z, cell_size)`.
#[pyfunction]
pub fn create(bound_x: i32, bound_z: i32, cell_size: i32) -> PyResult<AreaSearchWrapper> {
    AreaSearchWrapper::new(bound_x, bound_z, cell_size, None)
}

impl AreaSearchWrapper {
    fn grid(&self) -> PyResult<&AreaGrid> {
        self.grid.as_ref().ok_or_else(destroyed)
    }

    fn grid_mut(&mut self) -> PyResult<&mut AreaGrid> {
        self.grid.as_mut().ok_or_else(destroyed)
    }
}

#[pymethods]
impl AreaSearchWrapper {
    #[new]
    #[pyo3(signature = (bound_x, bound_z, cell_size, max_entities=None))]
    pub fn new(
        bound_x: i32,
        bound_z: i32,
        cell_size: i32,
        max_entities: Option<usize>,
    ) -> PyResult<Self> {
        let mut config = Config::default();
        if let Some(max_entities) = max_entities {
            config.max_entities = max_entities;
        }
        let grid = AreaGrid::new_with_config(bound_x, bound_z, cell_size, config)
            .map_err(map_area_grid_error)?;
        Ok(AreaSearchWrapper { grid: Some(grid) })
    }

    #[pyo3(signature = (id, x, z, radius, r#type=0))]
    pub fn insert(&mut self, id: u64, x: f32, z: f32, radius: f32, r#type: i32) -> PyResult<bool> {
        Ok(self.grid_mut()?.insert(id, x, z, radius, r#type))
    }

    #[pyo3(signature = (id, x, z, radius=None))]
    pub fn update(&mut self, id: u64, x: f32, z: f32, radius: Option<f32>) -> PyResult<bool> {
        Ok(self.grid_mut()?.update(id, x, z, radius))
    }

    pub fn delete(&mut self, id: u64) -> PyResult<()> {
        self.grid_mut()?.delete(id);
        Ok(())
    }

    /// Empty dict when the id is unknown.
    pub fn describe<'py>(&self, py: Python<'py>, id: u64) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        if let Some(record) = self.grid()?.describe(id) {
            dict.set_item("id", record.id)?;
            dict.set_item("x", record.x)?;
            dict.set_item("z", record.z)?;
            dict.set_item("radius", record.radius)?;
            dict.set_item("type", record.entity_type)?;
            dict.set_item("cell_row", record.cell_row)?;
            dict.set_item("cell_col", record.cell_col)?;
        }
        Ok(dict)
    }

    #[pyo3(signature = (x, z, radius, r#type=0, limit=DEFAULT_QUERY_LIMIT as i64))]
    pub fn search_circle(
        &self,
        x: f32,
        z: f32,
        radius: f32,
        r#type: i32,
        limit: i64,
    ) -> PyResult<HashSet<u64>> {
        let grid = self.grid()?;
        Ok(to_set(grid.search_circle(
            x,
            z,
            radius,
            r#type,
            clamp_limit(limit),
        )))
    }

    #[allow(clippy::too_many_arguments)]
    #[pyo3(signature = (x, z, dir_x, dir_z, half_width, half_height, r#type=0, limit=DEFAULT_QUERY_LIMIT as i64))]
    pub fn search_rect(
        &self,
        x: f32,
        z: f32,
        dir_x: f32,
        dir_z: f32,
        half_width: f32,
        half_height: f32,
        r#type: i32,
        limit: i64,
    ) -> PyResult<HashSet<u64>> {
        let grid = self.grid()?;
        Ok(to_set(grid.search_rect(
            x,
            z,
            dir_x,
            dir_z,
            half_width,
            half_height,
            r#type,
            clamp_limit(limit),
        )))
    }

    /// `angle` is the full opening angle in degrees.
    #[allow(clippy::too_many_arguments)]
    #[pyo3(signature = (x, z, dir_x, dir_z, angle, radius, r#type=0, limit=DEFAULT_QUERY_LIMIT as i64))]
    pub fn search_sector(
        &self,
        x: f32,
        z: f32,
        dir_x: f32,
        dir_z: f32,
        angle: f32,
        radius: f32,
        r#type: i32,
        limit: i64,
    ) -> PyResult<HashSet<u64>> {
        let grid = self.grid()?;
        Ok(to_set(grid.search_sector(
            x,
            z,
            dir_x,
            dir_z,
            angle,
            radius,
            r#type,
            clamp_limit(limit),
        )))
    }

    /// Releases the index. Every later call raises `ValueError`.
    pub fn destroy(&mut self) -> PyResult<()> {
        self.grid.take().map(drop).ok_or_else(destroyed)
    }

    pub fn __len__(&self) -> PyResult<usize> {
        Ok(self.grid()?.len())
    }
}
