//! Monolithic supervisor synthesis for a small factory: two machines feeding a
//! one-slot buffer, as originally proposed by Ramadge and Wonham. Composes the plant,
//! lifts the buffer specification to the plant alphabet and synthesizes the supremal
//! nonblocking supervisor.

use supcon::prelude::*;

fn machine(i: usize) -> Generator {
    Generator::builder()
        .named(format!("machine {i}"))
        .with_controllable_events([format!("alpha_{i}")])
        .with_transitions([
            (format!("Idle{i}"), format!("alpha_{i}"), format!("Busy{i}")),
            (format!("Busy{i}"), format!("beta_{i}"), format!("Idle{i}")),
        ])
        .with_initial(format!("Idle{i}"))
        .with_marked([format!("Idle{i}")])
        .build()
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    // compose the plant dynamics from two very simple machines
    let plant = parallel(&machine(1), &machine(2));
    println!("################################");
    println!("# small factory, plant model");
    println!("{plant}");
    println!("{}", plant.transition_table());

    // machine 1 fills the buffer, machine 2 drains it; overflow is forbidden
    let mut spec = Generator::builder()
        .named("buffer")
        .with_transitions([("Empty", "beta_1", "Full"), ("Full", "alpha_2", "Empty")])
        .with_initial("Empty")
        .with_marked(["Empty"])
        .build();
    inv_project(&mut spec, plant.alphabet());
    println!("################################");
    println!("# small factory, specification");
    println!("{spec}");

    // declare controllable events and run the synthesis
    let calph: EventSet = ["alpha_1", "alpha_2"].into_iter().collect();
    let supervisor = sup_con_nb(&plant, &calph, &spec)?;
    println!("################################");
    println!("# small factory, supervisor");
    println!("{supervisor}");
    println!("{}", supervisor.transition_table());
    println!("{}", supervisor.dot_representation());

    Ok(())
}
