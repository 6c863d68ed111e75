pub const QUERY_INSERT_CLIENT: &str = r#"
INSERT INTO client(id,name,cpf,age,is_admin) VALUES($1,$2,$3,$4,$5);
"#;

pub const QUERY_UPDATE_CLIENT: &str = r#"
UPDATE client SET name=$2,cpf=$3,age=$4,is_admin=$5 WHERE id=$1;
"#;

pub const QUERY_INSERT_PET: &str = r#"
INSERT INTO pet(id,client_id,name,breed,age,size_in_centimeters) VALUES($1,$2,$3,$4,$5,$6);
"#;

pub const QUERY_UPDATE_PET: &str = r#"
UPDATE pet SET client_id=$2,name=$3,breed=$4,age=$5,size_in_centimeters=$6 WHERE id=$1;
"#;

pub const QUERY_INSERT_SERVICE: &str = r#"
INSERT INTO services(id,duration_in_minutes,type_service,price) VALUES($1,$2,$3,$4);
"#;

pub const QUERY_UPDATE_SERVICE: &str = r#"
UPDATE services SET duration_in_minutes=$2,type_service=$3,price=$4 WHERE id=$1;
"#;

pub const QUERY_GET_SERVICES_BY_PRICE: &str = r#"
SELECT id,duration_in_minutes,type_service,price
FROM services
WHERE
    ($1 IS NULL OR price > $1)
    AND price <= $2
ORDER BY price ASC, id ASC;
"#;

pub const QUERY_INSERT_SCHEDULE: &str = r#"
INSERT INTO schedule(id,date_schedule,client_id,pet_id) VALUES($1,$2,$3,$4);
"#;

pub const QUERY_UPDATE_SCHEDULE: &str = r#"
UPDATE schedule SET date_schedule=$2,client_id=$3,pet_id=$4 WHERE id=$1;
"#;

/// Schedules owned by the client, directly or through one of its pets
pub const QUERY_GET_CLIENT_SCHEDULE_IDS: &str = r#"
SELECT s.id
FROM schedule AS s
WHERE
    s.client_id = $1
    OR s.pet_id IN (SELECT p.id FROM pet AS p WHERE p.client_id = $1);
"#;

const SELECT_SCHEDULE_DETAILS: &str = r#"
SELECT
    s.id,s.date_schedule,s.client_id,s.pet_id,
    c.name AS client_name,c.cpf AS client_cpf,c.age AS client_age,c.is_admin AS client_is_admin,
    p.name AS pet_name,p.breed AS pet_breed,p.age AS pet_age,
    p.size_in_centimeters AS pet_size_in_centimeters,p.client_id AS pet_client_id
FROM schedule AS s
INNER JOIN client AS c ON (c.id = s.client_id)
INNER JOIN pet AS p ON (p.id = s.pet_id)
"#;

pub fn query_get_schedule_details_by_id() -> String {
    format!("{SELECT_SCHEDULE_DETAILS} WHERE s.id = $1;")
}

pub fn query_get_schedules_details_page() -> String {
    format!("{SELECT_SCHEDULE_DETAILS} ORDER BY s.id ASC LIMIT $1 OFFSET $2;")
}

pub fn query_get_schedules_details_between() -> String {
    format!(
        "{SELECT_SCHEDULE_DETAILS} WHERE s.date_schedule >= $1 AND s.date_schedule < $2 ORDER BY s.date_schedule ASC, s.id ASC;"
    )
}

/// `$1` is a JSON array with the schedule ids
pub const QUERY_GET_SERVICES_OF_SCHEDULES: &str = r#"
SELECT ss.schedule_id,sv.id,sv.duration_in_minutes,sv.type_service,sv.price
FROM schedule_services AS ss
INNER JOIN services AS sv ON (sv.id = ss.services_id)
WHERE ss.schedule_id IN (SELECT value FROM json_each($1))
ORDER BY ss.schedule_id ASC, sv.id ASC;
"#;
