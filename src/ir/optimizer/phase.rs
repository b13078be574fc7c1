use crate::ir::Graph;

pub trait Phase {
    fn name(&self) -> &str;
    fn run(&mut self, graph: &mut Graph);
}

pub fn run_pipeline(graph: &mut Graph, phases: Vec<Box<dyn Phase>>) {
    for mut phase in phases {
        println!("Running phase: {}", phase.name());
        phase.run(graph);
    }
}
