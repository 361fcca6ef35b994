use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use zoon::Task;

/// Runs tree work on the browser event loop via [`Task::start`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskSpawner;

impl LocalSpawn for TaskSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        Task::start(future);
        Ok(())
    }
}
