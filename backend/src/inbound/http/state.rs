//! Shared HTTP adapter state.
//!
//! Handlers only depend on [`ResourceService`] values built from repository
//! ports, so the whole HTTP surface can be exercised without a database.

use std::sync::Arc;

use crate::domain::ResourceService;
use crate::domain::ports::{ReadinessProbe, ResourceRepository};
use crate::domain::resources::{
    AdminNombramientos, Cursos, CursosGrupos, Departamentos, Presupuestos, Profesores, Proyectos,
};

/// Parameter object bundling one repository per resource.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub departamentos: Arc<dyn ResourceRepository<Departamentos>>,
    pub cursos: Arc<dyn ResourceRepository<Cursos>>,
    pub cursos_grupos: Arc<dyn ResourceRepository<CursosGrupos>>,
    pub profesores: Arc<dyn ResourceRepository<Profesores>>,
    pub admin_nombramientos: Arc<dyn ResourceRepository<AdminNombramientos>>,
    pub presupuestos: Arc<dyn ResourceRepository<Presupuestos>>,
    pub proyectos: Arc<dyn ResourceRepository<Proyectos>>,
    pub readiness: Arc<dyn ReadinessProbe>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub departamentos: ResourceService<Departamentos>,
    pub cursos: ResourceService<Cursos>,
    pub cursos_grupos: ResourceService<CursosGrupos>,
    pub profesores: ResourceService<Profesores>,
    pub admin_nombramientos: ResourceService<AdminNombramientos>,
    pub presupuestos: ResourceService<Presupuestos>,
    pub proyectos: ResourceService<Proyectos>,
    pub readiness: Arc<dyn ReadinessProbe>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Wrap every repository in its service.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use sac_backend::domain::ports::FixtureReadinessProbe;
    /// use sac_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use sac_backend::outbound::persistence::{
    ///     DbPool, PoolConfig, SqlxAdminNombramientoRepository, SqlxCursoGrupoRepository,
    ///     SqlxCursoRepository, SqlxDepartamentoRepository, SqlxPresupuestoRepository,
    ///     SqlxProfesorRepository, SqlxProyectoRepository,
    /// };
    ///
    /// # async fn build() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::connect_lazy(&PoolConfig::new("postgresql://localhost/sac_mate"))?;
    /// let state = HttpState::new(HttpStatePorts {
    ///     departamentos: Arc::new(SqlxDepartamentoRepository::new(pool.clone())),
    ///     cursos: Arc::new(SqlxCursoRepository::new(pool.clone())),
    ///     cursos_grupos: Arc::new(SqlxCursoGrupoRepository::new(pool.clone())),
    ///     profesores: Arc::new(SqlxProfesorRepository::new(pool.clone())),
    ///     admin_nombramientos: Arc::new(SqlxAdminNombramientoRepository::new(pool.clone())),
    ///     presupuestos: Arc::new(SqlxPresupuestoRepository::new(pool.clone())),
    ///     proyectos: Arc::new(SqlxProyectoRepository::new(pool)),
    ///     readiness: Arc::new(FixtureReadinessProbe),
    /// });
    /// let _departamentos = state.departamentos.clone();
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            departamentos,
            cursos,
            cursos_grupos,
            profesores,
            admin_nombramientos,
            presupuestos,
            proyectos,
            readiness,
        } = ports;
        Self {
            departamentos: ResourceService::new(departamentos),
            cursos: ResourceService::new(cursos),
            cursos_grupos: ResourceService::new(cursos_grupos),
            profesores: ResourceService::new(profesores),
            admin_nombramientos: ResourceService::new(admin_nombramientos),
            presupuestos: ResourceService::new(presupuestos),
            proyectos: ResourceService::new(proyectos),
            readiness,
        }
    }
}
