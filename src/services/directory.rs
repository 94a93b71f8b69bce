//! In-memory view of the whole directory.
//!
//! Listings join personnel, positions, departments and both extension link
//! tables. The data set is a single organisation's staff, so everything is
//! loaded once and joined here instead of in SQL.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;

use super::container::parallel;
use crate::domain::{
    effective_extension, Department, DirectoryEntry, Extension, ExtensionStatus, Occupancy,
    Personnel, Position, PositionView,
};
use crate::errors::AppResult;
use crate::infra::Repositories;

/// Every directory table, loaded together.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    pub personnel: Vec<Personnel>,
    pub positions: Vec<Position>,
    pub departments: Vec<Department>,
    pub extensions: Vec<Extension>,
    /// (position_id, extension_id)
    pub position_links: Vec<(i32, i32)>,
    /// (personnel_id, extension_id)
    pub personnel_links: Vec<(i32, i32)>,
}

impl DirectorySnapshot {
    pub async fn load<C: ConnectionTrait>(repos: &Repositories<'_, C>) -> AppResult<Self> {
        let (personnel, positions, departments) = parallel::join3(
            repos.personnel().list(),
            repos.positions().list(),
            repos.departments().list(),
        )
        .await?;
        let (extensions, position_links, personnel_links) = parallel::join3(
            repos.extensions().list(),
            repos.extensions().all_position_links(),
            repos.extensions().all_personnel_links(),
        )
        .await?;

        Ok(Self {
            personnel,
            positions,
            departments,
            extensions,
            position_links,
            personnel_links,
        })
    }

    /// One entry per person, in storage order.
    pub fn entries(&self) -> Vec<DirectoryEntry> {
        let positions: HashMap<i32, &Position> =
            self.positions.iter().map(|p| (p.id, p)).collect();
        let departments = self.department_names();
        let numbers = self.extension_numbers();

        self.personnel
            .iter()
            .map(|person| {
                let position = person.position_id.and_then(|id| positions.get(&id).copied());
                let individual = sorted_numbers(&self.personnel_links, person.id, &numbers);
                let inherited = position
                    .map(|p| sorted_numbers(&self.position_links, p.id, &numbers))
                    .unwrap_or_default();

                DirectoryEntry {
                    id: person.id,
                    name: person.name.clone(),
                    email: person.email.clone(),
                    position_id: person.position_id,
                    position: position.map(|p| p.name.clone()),
                    department: position
                        .and_then(|p| departments.get(&p.department_id))
                        .map(|name| name.to_string()),
                    extension: effective_extension(&individual, &inherited),
                    description: person.description.clone(),
                    photo_url: person.photo_url.clone(),
                    in_carousel: person.in_carousel,
                    birth_date: person.birth_date,
                }
            })
            .collect()
    }

    /// Positions with department, linked extension and head count.
    pub fn position_views(&self) -> Vec<PositionView> {
        let departments = self.department_names();
        let extensions: HashMap<i32, &Extension> =
            self.extensions.iter().map(|e| (e.id, e)).collect();

        let mut head_count: HashMap<i32, u64> = HashMap::new();
        for position_id in self.personnel.iter().filter_map(|p| p.position_id) {
            *head_count.entry(position_id).or_default() += 1;
        }

        self.positions
            .iter()
            .map(|position| {
                let extension = self
                    .position_links
                    .iter()
                    .filter(|(pos, _)| *pos == position.id)
                    .filter_map(|(_, ext)| extensions.get(ext).copied())
                    .min_by(|a, b| a.number.cmp(&b.number));

                PositionView {
                    id: position.id,
                    name: position.name.clone(),
                    department_id: position.department_id,
                    department_name: departments
                        .get(&position.department_id)
                        .map(|name| name.to_string())
                        .unwrap_or_default(),
                    extension_id: extension.map(|e| e.id),
                    extension_number: extension.map(|e| e.number.clone()),
                    personnel_count: head_count.get(&position.id).copied().unwrap_or(0),
                }
            })
            .collect()
    }

    /// Extensions with their current occupant.
    pub fn extension_statuses(&self) -> Vec<ExtensionStatus> {
        let departments = self.department_names();
        let positions: HashMap<i32, &str> = self
            .positions
            .iter()
            .map(|p| (p.id, p.name.as_str()))
            .collect();
        let people: HashMap<i32, &str> = self
            .personnel
            .iter()
            .map(|p| (p.id, p.name.as_str()))
            .collect();

        self.extensions
            .iter()
            .map(|extension| {
                let position_name = self
                    .position_links
                    .iter()
                    .filter(|(_, ext)| *ext == extension.id)
                    .find_map(|(pos, _)| positions.get(pos))
                    .map(|name| name.to_string());
                let mut holders: Vec<(i32, String)> = self
                    .personnel_links
                    .iter()
                    .filter(|(_, ext)| *ext == extension.id)
                    .filter_map(|(person, _)| {
                        people.get(person).map(|name| (*person, name.to_string()))
                    })
                    .collect();
                holders.sort_by_key(|(id, _)| *id);

                let occupancy = Occupancy::resolve(
                    position_name,
                    holders.into_iter().map(|(_, name)| name).collect(),
                );
                let department_name = extension
                    .department_id
                    .and_then(|id| departments.get(&id))
                    .map(|name| name.to_string());

                ExtensionStatus::new(extension.clone(), department_name, occupancy)
            })
            .collect()
    }

    fn department_names(&self) -> HashMap<i32, &str> {
        self.departments
            .iter()
            .map(|d| (d.id, d.name.as_str()))
            .collect()
    }

    fn extension_numbers(&self) -> HashMap<i32, &str> {
        self.extensions
            .iter()
            .map(|e| (e.id, e.number.as_str()))
            .collect()
    }
}

/// Numbers linked to `owner`, ascending.
fn sorted_numbers(links: &[(i32, i32)], owner: i32, numbers: &HashMap<i32, &str>) -> Vec<String> {
    let mut found: Vec<String> = links
        .iter()
        .filter(|(id, _)| *id == owner)
        .filter_map(|(_, ext)| numbers.get(ext).map(|n| n.to_string()))
        .collect();
    found.sort();
    found
}
