//! Built-in phase catalog and templates.
//!
//! Phase definitions are shared across templates by id. Remodel templates
//! leave out structural phases that already exist in the building, so their
//! dependencies on those phases are treated as satisfied.
//!
//! Built-in templates register in this order, which is also the template
//! suggestion priority:
//! `residential_new_build`, `home_addition`, `basement_finish`,
//! `kitchen_remodel`, `bathroom_remodel`.

use crate::domain::models::{
    DependencyConstraint as Dep, LocationScope, PhaseCategory, PhaseDefinition, PhaseTemplate,
};

fn floors(levels: &[&str]) -> LocationScope {
    LocationScope::Floors {
        floors: levels.iter().map(ToString::to_string).collect(),
    }
}

fn rooms(room_types: &[&str]) -> LocationScope {
    LocationScope::Rooms {
        room_types: room_types.iter().map(ToString::to_string).collect(),
    }
}

fn zones(names: &[&str]) -> LocationScope {
    LocationScope::Zones {
        zones: names.iter().map(ToString::to_string).collect(),
    }
}

fn phase(id: &str, name: &str, short_name: &str, category: PhaseCategory) -> PhaseDefinition {
    PhaseDefinition::new(id, name)
        .with_short_name(short_name)
        .with_category(category)
}

/// Look up a built-in phase definition by id.
pub fn phase_definition(id: &str) -> Option<PhaseDefinition> {
    all_phases().into_iter().find(|p| p.id == id)
}

/// Every built-in phase definition.
#[allow(clippy::too_many_lines)]
pub fn all_phases() -> Vec<PhaseDefinition> {
    use PhaseCategory::{Envelope, Finish, Other, RoughIn, Structural};

    vec![
        phase("site_prep", "Site Preparation", "Site", Structural)
            .with_trades(&["excavation", "survey"]),
        phase("demolition", "Demolition", "Demo", Structural)
            .with_trades(&["demolition"]),
        phase("excavation", "Basement Excavation", "Dig", Structural)
            .with_trades(&["excavation"])
            .with_scope(floors(&["basement"]))
            .with_dependency(Dep::hard("site_prep", "Site must be cleared and staked before digging")),
        phase("foundation", "Foundation Pour", "Foundation", Structural)
            .with_trades(&["concrete"])
            .with_dependency(Dep::hard("site_prep", "Footings are set on a prepared site"))
            .with_dependency(Dep::hard("excavation", "Basement walls are poured into the excavation")),
        phase("basement_waterproofing", "Basement Waterproofing", "Waterproof", Envelope)
            .with_trades(&["waterproofing"])
            .with_scope(floors(&["basement"]))
            .with_dependency(Dep::hard("foundation", "Membrane is applied to cured foundation walls")),
        phase("garage_slab", "Garage Slab", "Garage", Structural)
            .with_trades(&["concrete"])
            .with_scope(zones(&["garage"]))
            .with_dependency(Dep::hard("foundation", "Slab ties into the foundation")),
        phase("framing", "Framing", "Frame", Structural)
            .with_trades(&["carpentry"])
            .with_dependency(Dep::hard("foundation", "Sill plates are anchored to the foundation")),
        phase("upper_floor_framing", "Upper Floor Framing", "Upper", Structural)
            .with_trades(&["carpentry"])
            .with_scope(floors(&["level_2", "level_3", "level_4"]))
            .with_dependency(Dep::hard("framing", "Upper floors bear on the main floor walls")),
        phase("roofing", "Roofing", "Roof", Envelope)
            .with_trades(&["roofing"])
            .with_dependency(Dep::hard("framing", "Roof deck is fastened to the frame"))
            .with_dependency(Dep::hard("upper_floor_framing", "Roof sits on the top floor")),
        phase("windows_doors", "Windows & Exterior Doors", "Windows", Envelope)
            .with_trades(&["glazing", "carpentry"])
            .with_dependency(Dep::hard("framing", "Openings are framed first"))
            .with_dependency(Dep::soft("roofing", "Dry in the roof before setting windows")),
        phase("exterior_siding", "Exterior Siding", "Siding", Envelope)
            .with_trades(&["siding"])
            .with_scope(zones(&["exterior"]))
            .with_dependency(Dep::hard("windows_doors", "Siding is flashed around installed windows"))
            .with_dependency(Dep::soft("roofing", "Drip edge should be in place before siding")),
        phase("rough_plumbing", "Rough Plumbing", "Rough Plumb", RoughIn)
            .with_trades(&["plumbing"])
            .with_dependency(Dep::hard("framing", "Supply and drain lines run through the frame"))
            .with_dependency(Dep::soft("demolition", "Open the walls before running new lines"))
            .with_dependency(Dep::soft("roofing", "Vent stacks are easier once the roof is on")),
        phase("rough_electrical", "Rough Electrical", "Rough Elec", RoughIn)
            .with_trades(&["electrical"])
            .with_dependency(Dep::hard("framing", "Boxes and wire are fastened to framing"))
            .with_dependency(Dep::soft("demolition", "Open the walls before running new circuits"))
            .with_dependency(Dep::soft("rough_plumbing", "Wiring routes around less flexible pipe runs")),
        phase("rough_hvac", "Rough HVAC", "Rough HVAC", RoughIn)
            .with_trades(&["hvac"])
            .with_dependency(Dep::hard("framing", "Ducts run through joist and stud bays"))
            .with_dependency(Dep::soft("demolition", "Open the ceilings before running new ducts"))
            .with_dependency(Dep::soft("rough_plumbing", "Ducts route around drain lines")),
        phase("rough_inspection", "Rough-In Inspection", "Rough Insp", RoughIn)
            .with_trades(&["inspection"])
            .with_dependency(Dep::hard("rough_plumbing", "Inspector must see exposed plumbing"))
            .with_dependency(Dep::hard("rough_electrical", "Inspector must see exposed wiring"))
            .with_dependency(Dep::hard("rough_hvac", "Inspector must see exposed ductwork")),
        phase("insulation", "Insulation", "Insul", Envelope)
            .with_trades(&["insulation"])
            .with_dependency(Dep::hard("rough_inspection", "Cavities stay open until rough-in passes inspection"))
            .with_dependency(Dep::soft("windows_doors", "Seal the envelope before insulating")),
        phase("drywall", "Drywall", "Drywall", Finish)
            .with_trades(&["drywall"])
            .with_dependency(Dep::hard("insulation", "Walls are closed over installed insulation"))
            .with_dependency(Dep::hard("rough_inspection", "Walls cannot be closed before rough-in inspection")),
        phase("interior_paint", "Interior Paint", "Paint", Finish)
            .with_trades(&["painting"])
            .with_dependency(Dep::hard("drywall", "Paint goes on finished drywall")),
        phase("basement_finishing", "Basement Finishing", "Basement", Finish)
            .with_trades(&["carpentry", "drywall"])
            .with_scope(floors(&["basement"]))
            .with_dependency(Dep::hard("basement_waterproofing", "Finished walls must not trap moisture"))
            .with_dependency(Dep::hard("drywall", "Basement finish follows main drywall")),
        phase("kitchen_cabinets", "Kitchen Cabinets", "Cabinets", Finish)
            .with_trades(&["cabinetry"])
            .with_scope(rooms(&["kitchen"]))
            .with_dependency(Dep::hard("drywall", "Cabinets hang on finished walls"))
            .with_dependency(Dep::soft("interior_paint", "Paint walls before cabinets go up")),
        phase("countertops", "Countertops", "Counters", Finish)
            .with_trades(&["stone"])
            .with_scope(rooms(&["kitchen"]))
            .with_dependency(Dep::hard("kitchen_cabinets", "Counters are templated on installed cabinets")),
        phase("bathroom_tile", "Bathroom Tile", "Tile", Finish)
            .with_trades(&["tile"])
            .with_scope(rooms(&["bathroom"]))
            .with_dependency(Dep::hard("drywall", "Tile backer is hung with the drywall"))
            .with_dependency(Dep::hard("rough_plumbing", "Valves and drains are set before tiling")),
        phase("flooring", "Flooring", "Floor", Finish)
            .with_trades(&["flooring"])
            .with_dependency(Dep::hard("drywall", "Drywall dust ruins finished floors"))
            .with_dependency(Dep::soft("interior_paint", "Paint before floors to avoid drips")),
        phase("trim_carpentry", "Trim Carpentry", "Trim", Finish)
            .with_trades(&["carpentry"])
            .with_dependency(Dep::hard("drywall", "Trim is nailed over finished walls"))
            .with_dependency(Dep::soft("flooring", "Baseboard sits on the finished floor")),
        phase("fixtures", "Fixtures & Devices", "Fixtures", Finish)
            .with_trades(&["plumbing", "electrical"])
            .with_dependency(Dep::hard("rough_plumbing", "Fixtures connect to rough plumbing"))
            .with_dependency(Dep::hard("rough_electrical", "Devices connect to rough wiring"))
            .with_dependency(Dep::soft("interior_paint", "Set fixtures after paint"))
            .with_dependency(Dep::soft("countertops", "Sinks and faucets mount to counters")),
        phase("final_inspection", "Final Inspection", "Final", Other)
            .with_trades(&["inspection"])
            .with_dependency(Dep::hard("fixtures", "All devices must be live for final inspection"))
            .with_dependency(Dep::soft("trim_carpentry", "Inspectors expect finished trim")),
    ]
}

fn template_phases(ids: &[&str]) -> Vec<PhaseDefinition> {
    let catalog = all_phases();
    ids.iter()
        .filter_map(|id| catalog.iter().find(|p| p.id == *id).cloned())
        .collect()
}

/// Built-in templates in registration order.
pub fn builtin_templates() -> Vec<PhaseTemplate> {
    vec![
        residential_new_build(),
        home_addition(),
        basement_finish(),
        kitchen_remodel(),
        bathroom_remodel(),
    ]
}

/// Ground-up house build.
pub fn residential_new_build() -> PhaseTemplate {
    PhaseTemplate::new("residential_new_build", "Residential New Build")
        .with_description("Ground-up single family house, from site work to final inspection")
        .with_project_types(&["new_build", "new_construction", "custom_home"])
        .with_phases(template_phases(&[
            "site_prep",
            "excavation",
            "foundation",
            "basement_waterproofing",
            "garage_slab",
            "framing",
            "upper_floor_framing",
            "roofing",
            "windows_doors",
            "exterior_siding",
            "rough_plumbing",
            "rough_electrical",
            "rough_hvac",
            "rough_inspection",
            "insulation",
            "drywall",
            "interior_paint",
            "basement_finishing",
            "kitchen_cabinets",
            "countertops",
            "bathroom_tile",
            "flooring",
            "trim_carpentry",
            "fixtures",
            "final_inspection",
        ]))
}

/// Addition to an existing house.
pub fn home_addition() -> PhaseTemplate {
    PhaseTemplate::new("home_addition", "Home Addition")
        .with_description("New conditioned space attached to an existing house")
        .with_project_types(&["addition", "extension"])
        .with_phases(template_phases(&[
            "site_prep",
            "excavation",
            "foundation",
            "framing",
            "upper_floor_framing",
            "roofing",
            "windows_doors",
            "exterior_siding",
            "rough_plumbing",
            "rough_electrical",
            "rough_hvac",
            "rough_inspection",
            "insulation",
            "drywall",
            "interior_paint",
            "kitchen_cabinets",
            "countertops",
            "bathroom_tile",
            "flooring",
            "trim_carpentry",
            "fixtures",
            "final_inspection",
        ]))
}

/// Finishing an existing unfinished basement.
pub fn basement_finish() -> PhaseTemplate {
    PhaseTemplate::new("basement_finish", "Basement Finish")
        .with_description("Turn an unfinished basement into living space")
        .with_project_types(&["basement_finish", "basement_renovation"])
        .with_phases(template_phases(&[
            "demolition",
            "basement_waterproofing",
            "rough_plumbing",
            "rough_electrical",
            "rough_hvac",
            "rough_inspection",
            "insulation",
            "drywall",
            "basement_finishing",
            "interior_paint",
            "bathroom_tile",
            "flooring",
            "trim_carpentry",
            "fixtures",
            "final_inspection",
        ]))
}

/// Kitchen gut and refit.
pub fn kitchen_remodel() -> PhaseTemplate {
    PhaseTemplate::new("kitchen_remodel", "Kitchen Remodel")
        .with_description("Gut and refit of an existing kitchen")
        .with_project_types(&["kitchen_remodel", "kitchen", "remodel"])
        .with_phases(template_phases(&[
            "demolition",
            "rough_plumbing",
            "rough_electrical",
            "rough_inspection",
            "drywall",
            "interior_paint",
            "kitchen_cabinets",
            "countertops",
            "flooring",
            "fixtures",
            "final_inspection",
        ]))
}

/// Bathroom gut and refit.
pub fn bathroom_remodel() -> PhaseTemplate {
    PhaseTemplate::new("bathroom_remodel", "Bathroom Remodel")
        .with_description("Gut and refit of an existing bathroom")
        .with_project_types(&["bathroom_remodel", "bathroom"])
        .with_phases(template_phases(&[
            "demolition",
            "rough_plumbing",
            "rough_electrical",
            "rough_inspection",
            "drywall",
            "bathroom_tile",
            "interior_paint",
            "fixtures",
            "final_inspection",
        ]))
}
