//! Skill catalog, employee skill profiles and projects.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(SKILLS_SQL).await?;
        db.execute_unprepared(EMPLOYEE_SKILLS_SQL).await?;
        db.execute_unprepared(PROJECTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const SKILLS_SQL: &str = r"
CREATE TABLE skills (
    skill           VARCHAR(100) PRIMARY KEY,
    task            VARCHAR(255) NOT NULL,

    CONSTRAINT chk_skill_not_blank CHECK (char_length(btrim(skill)) > 0)
);
";

const EMPLOYEE_SKILLS_SQL: &str = r"
CREATE TABLE employee_skills (
    employee_id     VARCHAR(32) NOT NULL REFERENCES employees(work_permit_number) ON DELETE CASCADE,
    skill_id        VARCHAR(100) NOT NULL REFERENCES skills(skill) ON DELETE CASCADE,
    company_id      VARCHAR(10) NOT NULL REFERENCES companies(uen) ON DELETE CASCADE,
    experience      INTEGER NOT NULL DEFAULT 0,
    rating          NUMERIC(3, 2) NOT NULL DEFAULT 0,
    cost            NUMERIC(19, 2) NOT NULL DEFAULT 0,

    PRIMARY KEY (employee_id, skill_id),
    CONSTRAINT chk_employee_skill_experience CHECK (experience >= 0),
    CONSTRAINT chk_employee_skill_rating CHECK (rating BETWEEN 0 AND 5),
    CONSTRAINT chk_employee_skill_cost CHECK (cost >= 0)
);

CREATE INDEX idx_employee_skills_company ON employee_skills(company_id);
CREATE INDEX idx_employee_skills_skill ON employee_skills(skill_id);
";

const PROJECTS_SQL: &str = r"
CREATE TABLE projects (
    id              BIGSERIAL PRIMARY KEY,
    name            VARCHAR(255) NOT NULL,
    start_date      DATE NOT NULL,
    completion_date DATE,
    budget          VARCHAR(255),
    progress        NUMERIC(5, 2) NOT NULL DEFAULT 0,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_project_dates CHECK (completion_date IS NULL OR completion_date >= start_date),
    CONSTRAINT chk_project_progress CHECK (progress BETWEEN 0 AND 100)
);

CREATE TABLE project_employees (
    project_id      BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    employee_id     VARCHAR(32) NOT NULL REFERENCES employees(work_permit_number) ON DELETE CASCADE,

    PRIMARY KEY (project_id, employee_id)
);

CREATE INDEX idx_project_employees_employee ON project_employees(employee_id);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS project_employees CASCADE;
DROP TABLE IF EXISTS projects CASCADE;
DROP TABLE IF EXISTS employee_skills CASCADE;
DROP TABLE IF EXISTS skills CASCADE;
";
