// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use prettytable::{cell, format::consts::FORMAT_NO_LINESEP, row, table, Cell, Row, Table};
use std::collections::{BTreeSet, HashMap};

pub trait Entity {
    type Id;

    fn get_id(&self) -> Self::Id;
    fn get_data(&self) -> HashMap<String, String> {
        Default::default()
    }
}

pub trait ToTable {
    fn to_table(&self) -> Table;
}

impl<I: ToString, E: Entity<Id = I>> ToTable for E {
    fn to_table(&self) -> Table {
        let mut table = table![["id", self.get_id()]];

        let data = self.get_data();
        let keys: BTreeSet<_> = data.keys().collect();
        for key in keys {
            table.add_row(row![key, data[key]]);
        }

        table.set_format(*FORMAT_NO_LINESEP);
        table
    }
}

// A list of entities is rendered as a single table, one row per entity, the
// first column being its position in the list.
impl<I: ToString, E: Entity<Id = I>> ToTable for [E] {
    fn to_table(&self) -> Table {
        let data: Vec<_> = self.iter().map(Entity::get_data).collect();
        let keys: BTreeSet<_> = data.iter().flat_map(HashMap::keys).cloned().collect();

        let mut header = vec![Cell::new("#"), Cell::new("id")];
        header.extend(keys.iter().map(|key| Cell::new(key)));

        let mut table = Table::new();
        table.set_titles(Row::new(header));

        for (pos, (entity, data)) in self.iter().zip(&data).enumerate() {
            let mut cells = vec![
                Cell::new(&(pos + 1).to_string()),
                Cell::new(&entity.get_id().to_string()),
            ];

            for key in &keys {
                cells.push(Cell::new(data.get(key).map(String::as_str).unwrap_or("")));
            }

            table.add_row(Row::new(cells));
        }

        table.set_format(*FORMAT_NO_LINESEP);
        table
    }
}

impl<K, V, B> ToTable for HashMap<K, V, B>
where
    K: ToString,
    V: ToString,
{
    fn to_table(&self) -> Table {
        let mut table = Table::new();

        for (key, val) in self {
            table.add_row(row![key, val]);
        }

        table.set_format(*FORMAT_NO_LINESEP);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_macros::hash_map;

    struct Film(i32, &'static str);

    impl Entity for Film {
        type Id = i32;

        fn get_id(&self) -> Self::Id {
            self.0
        }

        fn get_data(&self) -> HashMap<String, String> {
            hash_map! {
                "title".into() => self.1.into(),
            }
        }
    }

    #[test]
    fn single_entity_table() {
        let table = Film(3, "Alien").to_table();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get_row(0).unwrap().get_cell(1).unwrap().get_content(), "3");
        assert_eq!(table.get_row(1).unwrap().get_cell(1).unwrap().get_content(), "Alien");
    }

    #[test]
    fn entity_list_table() {
        let films = vec![Film(3, "Alien"), Film(1, "Heat")];
        let table = films.as_slice().to_table();

        assert_eq!(table.len(), 2);

        let second = table.get_row(1).unwrap();
        assert_eq!(second.get_cell(0).unwrap().get_content(), "2");
        assert_eq!(second.get_cell(1).unwrap().get_content(), "1");
        assert_eq!(second.get_cell(2).unwrap().get_content(), "Heat");
    }
}
